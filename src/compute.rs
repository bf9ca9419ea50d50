//! Pure game-logic functions.
//!
//! Every public function takes an immutable reference to the current
//! `GameState` (and, where needed, an RNG handle) and returns a brand-new
//! `GameState`.  Side effects are limited to the injected RNG.

use rand::Rng;

use crate::collision::resolve;
use crate::config::GameConfig;
use crate::entities::{Bird, GameState, GameStatus, Obstacle, ObstacleTemplate};

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial state of an attempt from a parsed schedule.
///
/// The bird starts at rest, vertically centred.
pub fn init_state(schedule: &[ObstacleTemplate], config: &GameConfig) -> GameState {
    let mut pending = schedule.to_vec();
    pending.sort_by(|a, b| a.appear_at_secs.total_cmp(&b.appear_at_secs));

    GameState {
        bird: Bird {
            x: config.bird_x,
            y: (config.playfield_height - config.bird_height) / 2.0,
            vy: 0.0,
        },
        obstacles: Vec::new(),
        pending,
        lives: config.initial_lives,
        score: 0,
        status: GameStatus::Playing,
        elapsed_ms: 0,
    }
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

/// Set the bird's velocity to the flap impulse.  Physics only happens on
/// ticks, so nothing else changes.
pub fn flap(state: &GameState, config: &GameConfig) -> GameState {
    if state.is_over() {
        return state.clone();
    }
    GameState {
        bird: Bird {
            vy: -config.flap_impulse,
            ..state.bird
        },
        ..state.clone()
    }
}

// ── Per-tick step (nearly pure — RNG is injected) ───────────────────────────

/// Advance the simulation by one tick.  All randomness comes through `rng`
/// so callers control determinism (useful for tests with a seeded RNG).
///
/// A pipe is scored once its right edge is left of the bird's left edge
/// (`bird.x`), i.e. the whole bird has cleared it.
///
/// A finished game is returned unchanged.
pub fn tick(state: &GameState, config: &GameConfig, rng: &mut impl Rng) -> GameState {
    if state.is_over() {
        return state.clone();
    }

    // ── 1. Gravity ───────────────────────────────────────────────────────────
    let vy = state.bird.vy + config.gravity;
    let bird = Bird {
        y: state.bird.y + vy,
        vy,
        ..state.bird
    };

    // ── 2. Scroll ────────────────────────────────────────────────────────────
    let mut obstacles: Vec<Obstacle> = state
        .obstacles
        .iter()
        .map(|o| Obstacle {
            x: o.x - config.scroll_speed,
            ..o.clone()
        })
        .collect();

    // ── 3. Clock ─────────────────────────────────────────────────────────────
    let elapsed_ms = state.elapsed_ms + config.tick_interval_ms;

    // ── 4–5. Spawn due pipes at the right edge ───────────────────────────────
    let (due, pending): (Vec<ObstacleTemplate>, Vec<ObstacleTemplate>) = state
        .pending
        .iter()
        .cloned()
        .partition(|t| t.is_due(elapsed_ms));
    obstacles.extend(due.iter().map(|t| Obstacle::spawn(t, config.playfield_width)));

    // ── 6. Collisions ────────────────────────────────────────────────────────
    let resolution = resolve(&bird, &obstacles, config, rng);
    let bird = resolution.bird;
    let lives = state.lives.saturating_add_signed(resolution.life_delta);

    // ── 7. Score pipes the bird has cleared ──────────────────────────────────
    let mut score_gain = 0;
    for o in obstacles.iter_mut() {
        if !o.passed && o.x + config.obstacle_width < bird.x {
            o.passed = true;
            score_gain += 1;
        }
    }

    // ── 8. Cull pipes that have left the screen ──────────────────────────────
    obstacles.retain(|o| o.x + config.obstacle_width >= 0.0);

    // ── 9. Game over ─────────────────────────────────────────────────────────
    let course_done = pending.is_empty() && obstacles.is_empty();
    let status = if lives == 0 || course_done {
        GameStatus::GameOver
    } else {
        GameStatus::Playing
    };

    GameState {
        bird,
        obstacles,
        pending,
        lives,
        score: state.score + score_gain,
        status,
        elapsed_ms,
    }
}
