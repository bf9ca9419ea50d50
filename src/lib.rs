//! Flappy Ghost — a deterministic flappy-bird core with ghost replays.
//!
//! The library holds everything that is pure game logic; the terminal
//! frontend in `main.rs` only feeds it actions and draws what comes back.

pub mod actions;
pub mod collision;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod recorder;
pub mod schedule;
