//! Flight-path recording and the history of finished attempts.
//!
//! [`RunRecorder`] watches every transition of the current attempt and keeps
//! one [`TrajectorySample`] per tick.  When the attempt ends it commits the
//! samples to a caller-owned [`RunHistory`] and starts over empty.

use log::{debug, info};
use rand::Rng;

use crate::actions::{apply, Action};
use crate::compute::init_state;
use crate::config::GameConfig;
use crate::entities::{CompletedRun, GameState, ObstacleTemplate, TrajectorySample};

// ── History ──────────────────────────────────────────────────────────────────

/// Append-only list of completed runs, in commit order.
#[derive(Clone, Debug, Default)]
pub struct RunHistory {
    runs: Vec<CompletedRun>,
}

impl RunHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn runs(&self) -> &[CompletedRun] {
        &self.runs
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Runs ranked by score, best first.  Equal scores keep commit order.
    pub fn leaderboard(&self) -> Vec<&CompletedRun> {
        let mut ranked: Vec<&CompletedRun> = self.runs.iter().collect();
        ranked.sort_by(|a, b| b.score.cmp(&a.score).then(a.id.cmp(&b.id)));
        ranked
    }

    pub fn best(&self) -> Option<&CompletedRun> {
        self.leaderboard().into_iter().next()
    }

    fn commit(&mut self, samples: Vec<TrajectorySample>, score: u32) -> &CompletedRun {
        let id = self.runs.len() + 1;
        self.runs.push(CompletedRun { id, samples, score });
        &self.runs[id - 1]
    }
}

// ── Recorder ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct RunRecorder {
    buffer: Vec<TrajectorySample>,
}

impl RunRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Samples of the attempt in progress.
    pub fn buffer(&self) -> &[TrajectorySample] {
        &self.buffer
    }

    /// Drop the in-flight samples without committing anything.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Record the transition `prev -> next`.
    ///
    /// Transitions that did not advance the clock (flaps) and transitions out
    /// of an already finished game are ignored.  Returns the run committed by
    /// this transition, if any.
    pub fn observe<'h>(
        &mut self,
        prev: &GameState,
        next: &GameState,
        history: &'h mut RunHistory,
    ) -> Option<&'h CompletedRun> {
        if prev.is_over() || next.elapsed_ms == prev.elapsed_ms {
            return None;
        }

        self.buffer.push(TrajectorySample::of(next));
        if !next.is_over() {
            return None;
        }

        let samples = std::mem::take(&mut self.buffer);
        let run = history.commit(samples, next.score);
        info!(
            "Committed run #{} (score {}, {} samples)",
            run.id,
            run.score,
            run.samples.len()
        );
        Some(run)
    }
}

// ── Session ──────────────────────────────────────────────────────────────────

/// One game timeline: the current attempt, its recorder and the history of
/// every attempt finished so far.
#[derive(Clone, Debug)]
pub struct Session {
    config: GameConfig,
    schedule: Vec<ObstacleTemplate>,
    state: GameState,
    recorder: RunRecorder,
    history: RunHistory,
    attempt: u32,
}

impl Session {
    pub fn new(schedule: Vec<ObstacleTemplate>, config: GameConfig) -> Self {
        let state = init_state(&schedule, &config);
        Session {
            config,
            schedule,
            state,
            recorder: RunRecorder::new(),
            history: RunHistory::new(),
            attempt: 1,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn history(&self) -> &RunHistory {
        &self.history
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn recorder(&self) -> &RunRecorder {
        &self.recorder
    }

    /// 1-based number of the attempt in progress.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Apply one action and let the recorder see the transition.  Returns the
    /// run committed by this action, if it ended the attempt.
    pub fn apply(&mut self, action: Action, rng: &mut impl Rng) -> Option<&CompletedRun> {
        let next = apply(&self.state, action, &self.config, rng);
        let prev = std::mem::replace(&mut self.state, next);
        self.recorder.observe(&prev, &self.state, &mut self.history)
    }

    /// Throw away the attempt in progress and start a fresh one.  Only the
    /// run history carries over.
    pub fn restart(&mut self) {
        if !self.state.is_over() {
            debug!(
                "Abandoning attempt {} with {} unrecorded samples",
                self.attempt,
                self.recorder.buffer().len()
            );
        }
        self.recorder.reset();
        self.state = init_state(&self.schedule, &self.config);
        self.attempt += 1;
        info!("Starting attempt {}", self.attempt);
    }
}
