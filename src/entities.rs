//! All game entity types — pure data, no logic.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    /// Terminal latch: once set, every further transition is a no-op.
    GameOver,
}

// ── Bird ──────────────────────────────────────────────────────────────────────

/// The player.  `(x, y)` is the top-left corner in playfield pixels,
/// `y` grows downward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bird {
    pub x: f64,
    pub y: f64,
    /// Vertical velocity in pixels per tick (negative = upward).
    pub vy: f64,
}

// ── Obstacles ─────────────────────────────────────────────────────────────────

/// A scheduled pipe that has not entered the playfield yet.
#[derive(Clone, Debug, PartialEq)]
pub struct ObstacleTemplate {
    pub id: usize,
    pub gap_center: f64,
    pub gap_height: f64,
    /// Seconds from the start of the attempt.
    pub appear_at_secs: f64,
}

impl ObstacleTemplate {
    /// Appearance time rounded to whole milliseconds, so decimal times such
    /// as `8.14` land on `8140` instead of one ulp above it.
    pub fn appear_at_ms(&self) -> u64 {
        (self.appear_at_secs * 1000.0).round() as u64
    }

    pub fn is_due(&self, elapsed_ms: u64) -> bool {
        self.appear_at_ms() <= elapsed_ms
    }
}

/// A pipe pair on the playfield.
#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub id: usize,
    pub gap_center: f64,
    pub gap_height: f64,
    /// Left edge.
    pub x: f64,
    /// Set once the bird has cleared this pipe and it has been scored.
    pub passed: bool,
}

impl Obstacle {
    pub fn spawn(template: &ObstacleTemplate, x: f64) -> Self {
        Obstacle {
            id: template.id,
            gap_center: template.gap_center,
            gap_height: template.gap_height,
            x,
            passed: false,
        }
    }

    pub fn gap_top(&self) -> f64 {
        self.gap_center - self.gap_height / 2.0
    }

    pub fn gap_bottom(&self) -> f64 {
        self.gap_center + self.gap_height / 2.0
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire state of one attempt.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub bird: Bird,
    /// Active pipes in spawn order.
    pub obstacles: Vec<Obstacle>,
    /// Templates still waiting for their appearance time, sorted by time.
    pub pending: Vec<ObstacleTemplate>,
    pub lives: u32,
    pub score: u32,
    pub status: GameStatus,
    pub elapsed_ms: u64,
}

impl GameState {
    pub fn is_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }
}

// ── Run history ───────────────────────────────────────────────────────────────

/// Where the bird was at one tick of an attempt.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrajectorySample {
    pub elapsed_ms: u64,
    pub x: f64,
    pub y: f64,
}

impl TrajectorySample {
    pub fn of(state: &GameState) -> Self {
        TrajectorySample {
            elapsed_ms: state.elapsed_ms,
            x: state.bird.x,
            y: state.bird.y,
        }
    }
}

/// One finished attempt.  Immutable once committed.
#[derive(Clone, Debug, PartialEq)]
pub struct CompletedRun {
    /// 1-based, in commit order.
    pub id: usize,
    pub samples: Vec<TrajectorySample>,
    pub score: u32,
}

impl CompletedRun {
    /// The ghost position at `elapsed_ms`: the last sample taken at or before
    /// that time.  `None` before the first sample or after the run ended.
    pub fn sample_at(&self, elapsed_ms: u64) -> Option<&TrajectorySample> {
        let last = self.samples.last()?;
        if elapsed_ms > last.elapsed_ms {
            return None;
        }
        let idx = self.samples.partition_point(|s| s.elapsed_ms <= elapsed_ms);
        idx.checked_sub(1).map(|i| &self.samples[i])
    }

    pub fn duration_ms(&self) -> u64 {
        self.samples.last().map(|s| s.elapsed_ms).unwrap_or(0)
    }
}
