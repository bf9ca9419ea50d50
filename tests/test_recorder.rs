use flappy_ghost::actions::Action;
use flappy_ghost::compute::{flap, init_state, tick};
use flappy_ghost::config::GameConfig;
use flappy_ghost::entities::*;
use flappy_ghost::recorder::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn config() -> GameConfig {
    GameConfig::default()
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn far_template() -> ObstacleTemplate {
    ObstacleTemplate {
        id: 0,
        gap_center: 200.0,
        gap_height: 390.0,
        appear_at_secs: 1000.0,
    }
}

/// A short course: three wide-open pipes, so the attempt ends by exhaustion.
fn short_course() -> Vec<ObstacleTemplate> {
    (0..3)
        .map(|i| ObstacleTemplate {
            id: i,
            gap_center: 200.0,
            gap_height: 390.0,
            appear_at_secs: 0.1 * i as f64,
        })
        .collect()
}

// ── RunRecorder ───────────────────────────────────────────────────────────────

#[test]
fn tick_appends_sample_of_new_state() {
    let mut rec = RunRecorder::new();
    let mut history = RunHistory::new();
    let s0 = init_state(&[far_template()], &config());
    let s1 = tick(&s0, &config(), &mut seeded_rng());

    assert!(rec.observe(&s0, &s1, &mut history).is_none());
    assert_eq!(rec.buffer(), &[TrajectorySample::of(&s1)]);
    assert_eq!(rec.buffer()[0].elapsed_ms, 20);
    assert!(history.is_empty());
}

#[test]
fn flap_transition_is_not_sampled() {
    let mut rec = RunRecorder::new();
    let mut history = RunHistory::new();
    let s0 = init_state(&[far_template()], &config());
    let s1 = flap(&s0, &config());
    assert!(rec.observe(&s0, &s1, &mut history).is_none());
    assert!(rec.buffer().is_empty());
}

#[test]
fn terminal_transition_commits_run() {
    let mut rec = RunRecorder::new();
    let mut history = RunHistory::new();
    let mut rng = seeded_rng();

    let s0 = init_state(&[far_template()], &config());
    let s1 = tick(&s0, &config(), &mut rng);
    rec.observe(&s0, &s1, &mut history);

    let mut s2 = tick(&s1, &config(), &mut rng);
    s2.status = GameStatus::GameOver;
    s2.score = 7;
    let run = rec.observe(&s1, &s2, &mut history).cloned().unwrap();

    assert_eq!(run.id, 1);
    assert_eq!(run.score, 7);
    assert_eq!(run.samples.len(), 2);
    assert_eq!(run.samples.last(), Some(&TrajectorySample::of(&s2)));
    assert!(rec.buffer().is_empty());
    assert_eq!(history.runs(), &[run]);
}

#[test]
fn transitions_after_game_over_are_ignored() {
    let mut rec = RunRecorder::new();
    let mut history = RunHistory::new();
    let mut s = init_state(&[], &config());
    s.status = GameStatus::GameOver;
    let mut later = s.clone();
    later.elapsed_ms += 20;
    assert!(rec.observe(&s, &later, &mut history).is_none());
    assert!(rec.buffer().is_empty());
    assert!(history.is_empty());
}

#[test]
fn reset_discards_in_flight_samples() {
    let mut rec = RunRecorder::new();
    let mut history = RunHistory::new();
    let s0 = init_state(&[far_template()], &config());
    let s1 = tick(&s0, &config(), &mut seeded_rng());
    rec.observe(&s0, &s1, &mut history);
    rec.reset();
    assert!(rec.buffer().is_empty());
    assert!(history.is_empty());
}

#[test]
fn histories_are_independent() {
    let mut a = RunHistory::new();
    let b = RunHistory::new();
    let mut rec = RunRecorder::new();
    let s0 = init_state(&[], &config());
    let s1 = tick(&s0, &config(), &mut seeded_rng()); // exhausted → over
    rec.observe(&s0, &s1, &mut a);
    assert_eq!(a.len(), 1);
    assert!(b.is_empty());
}

// ── Session ───────────────────────────────────────────────────────────────────

#[test]
fn empty_course_ends_on_first_tick() {
    let mut session = Session::new(Vec::new(), config());
    let run = session.apply(Action::Tick, &mut seeded_rng()).cloned().unwrap();
    assert_eq!(run.id, 1);
    assert_eq!(run.score, 0);
    assert_eq!(run.samples.len(), 1);
    assert!(session.state().is_over());
}

#[test]
fn one_run_per_attempt_with_full_trajectory() {
    let mut session = Session::new(short_course(), config());
    let mut rng = seeded_rng();
    let mut ticks = 0;
    let mut commits = 0;

    for i in 0..5_000 {
        if session.state().is_over() {
            break;
        }
        if i % 8 == 0 {
            assert!(session.apply(Action::Flap, &mut rng).is_none());
        }
        ticks += 1;
        if session.apply(Action::Tick, &mut rng).is_some() {
            commits += 1;
        }
    }
    assert!(session.state().is_over());
    assert_eq!(commits, 1);

    // More ticks after the end change nothing.
    for _ in 0..10 {
        assert!(session.apply(Action::Tick, &mut rng).is_none());
    }

    let runs = session.history().runs();
    assert_eq!(runs.len(), 1);
    let run = &runs[0];
    assert_eq!(run.samples.len(), ticks);
    assert_eq!(run.samples.last().unwrap().elapsed_ms, session.state().elapsed_ms);
    assert_eq!(run.score, session.state().score);
    assert!(run
        .samples
        .windows(2)
        .all(|w| w[1].elapsed_ms == w[0].elapsed_ms + 20));
}

#[test]
fn restart_keeps_history_and_assigns_next_id() {
    let mut session = Session::new(Vec::new(), config());
    let mut rng = seeded_rng();
    session.apply(Action::Tick, &mut rng);
    assert_eq!(session.attempt(), 1);

    session.restart();
    assert_eq!(session.attempt(), 2);
    assert!(!session.state().is_over());
    assert_eq!(session.state().elapsed_ms, 0);
    assert_eq!(session.history().len(), 1);

    let run = session.apply(Action::Tick, &mut rng).cloned().unwrap();
    assert_eq!(run.id, 2);
    let ids: Vec<usize> = session.history().runs().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn restart_mid_attempt_commits_nothing() {
    let mut session = Session::new(vec![far_template()], config());
    let mut rng = seeded_rng();
    for _ in 0..5 {
        session.apply(Action::Tick, &mut rng);
    }
    assert_eq!(session.recorder().buffer().len(), 5);

    session.restart();
    assert!(session.recorder().buffer().is_empty());
    assert!(session.history().is_empty());
    assert_eq!(session.state().lives, 3);
}

// ── Leaderboard ───────────────────────────────────────────────────────────────

fn history_with_scores(scores: &[u32]) -> RunHistory {
    let mut history = RunHistory::new();
    for &score in scores {
        let mut rec = RunRecorder::new();
        let s0 = init_state(&[], &config());
        let mut s1 = tick(&s0, &config(), &mut seeded_rng());
        s1.score = score;
        rec.observe(&s0, &s1, &mut history);
    }
    history
}

#[test]
fn leaderboard_ranks_by_score_then_age() {
    let history = history_with_scores(&[3, 9, 3, 5]);
    let ranked: Vec<(usize, u32)> = history
        .leaderboard()
        .iter()
        .map(|r| (r.id, r.score))
        .collect();
    assert_eq!(ranked, vec![(2, 9), (4, 5), (1, 3), (3, 3)]);
}

#[test]
fn leaderboard_leaves_commit_order_untouched() {
    let history = history_with_scores(&[1, 4, 2]);
    let _ = history.leaderboard();
    let ids: Vec<usize> = history.runs().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn best_run() {
    assert!(RunHistory::new().best().is_none());
    let history = history_with_scores(&[2, 8, 8]);
    assert_eq!(history.best().map(|r| r.id), Some(2));
}
