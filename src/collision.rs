//! Collision resolution for a single tick.
//!
//! Only the first matching collision is resolved: ceiling, then floor, then
//! the first pipe in spawn order.  Every hit costs exactly one life and sends
//! the bird off with a random bounce speed drawn from the configured band.

use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{Bird, Obstacle};

/// Outcome of [`resolve`]: the bird after any bounce and the change in lives.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resolution {
    pub bird: Bird,
    /// `-1` on a hit, `0` otherwise.
    pub life_delta: i32,
}

impl Resolution {
    fn clear(bird: Bird) -> Self {
        Resolution { bird, life_delta: 0 }
    }

    fn hit(bird: Bird) -> Self {
        Resolution { bird, life_delta: -1 }
    }

    pub fn is_hit(&self) -> bool {
        self.life_delta != 0
    }
}

fn bounce_speed(config: &GameConfig, rng: &mut impl Rng) -> f64 {
    rng.gen_range(config.bounce_min..=config.bounce_max)
}

/// Whether the pipe's columns overlap the bird's.
pub fn overlaps_horizontally(bird: &Bird, obstacle: &Obstacle, config: &GameConfig) -> bool {
    bird.x < obstacle.x + config.obstacle_width && obstacle.x < bird.x + config.bird_width
}

/// Whether the bird's whole height fits inside the pipe's gap.
pub fn fits_gap(bird: &Bird, obstacle: &Obstacle, config: &GameConfig) -> bool {
    bird.y >= obstacle.gap_top() && bird.y + config.bird_height <= obstacle.gap_bottom()
}

/// Check the bird against the playfield bounds and the pipes.
pub fn resolve(
    bird: &Bird,
    obstacles: &[Obstacle],
    config: &GameConfig,
    rng: &mut impl Rng,
) -> Resolution {
    // ── Ceiling ──────────────────────────────────────────────────────────────
    if bird.y <= 0.0 {
        return Resolution::hit(Bird {
            y: 0.0,
            vy: bounce_speed(config, rng),
            ..*bird
        });
    }

    // ── Floor ────────────────────────────────────────────────────────────────
    let floor = config.playfield_height - config.bird_height;
    if bird.y >= floor {
        return Resolution::hit(Bird {
            y: floor,
            vy: -bounce_speed(config, rng),
            ..*bird
        });
    }

    // ── Pipes ────────────────────────────────────────────────────────────────
    let struck = obstacles
        .iter()
        .find(|o| overlaps_horizontally(bird, o, config) && !fits_gap(bird, o, config));

    match struck {
        Some(pipe) => {
            let speed = bounce_speed(config, rng);
            // Above the gap: knocked down.  Below it: knocked up.
            let vy = if bird.y < pipe.gap_top() { speed } else { -speed };
            Resolution::hit(Bird { vy, ..*bird })
        }
        None => Resolution::clear(*bird),
    }
}
