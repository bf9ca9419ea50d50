//! Input-to-action mapping.
//!
//! Two sources feed the game: a periodic tick pulse and discrete player
//! commands.  [`ActionStream`] merges them into a single ordered stream and
//! the game applies that stream with a strict left fold ([`fold_actions`]).
//!
//! ```text
//!   ticker ──(every tick_interval)──┐
//!                                   ├──> ActionStream::next ──> apply ──> GameState
//!   commands ──(Flap/Restart/Quit)──┘
//! ```

use std::time::{Duration, Instant};

use crossbeam_channel::{select, tick, Receiver, RecvTimeoutError, TryRecvError};
use log::debug;
use rand::Rng;

use crate::compute;
use crate::config::GameConfig;
use crate::entities::GameState;

/// A state transformation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Advance the simulation by one tick.
    Tick,
    /// Set the bird's velocity to the upward flap impulse.
    Flap,
}

/// What the frontend sends down the command channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    Flap,
    Restart,
    Quit,
}

/// One item of the merged stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Act(Action),
    Restart,
    Quit,
}

impl From<Command> for Event {
    fn from(cmd: Command) -> Self {
        match cmd {
            Command::Flap => Event::Act(Action::Flap),
            Command::Restart => Event::Restart,
            Command::Quit => Event::Quit,
        }
    }
}

// ── Folding ──────────────────────────────────────────────────────────────────

pub fn apply(
    state: &GameState,
    action: Action,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> GameState {
    match action {
        Action::Tick => compute::tick(state, config, rng),
        Action::Flap => compute::flap(state, config),
    }
}

/// Apply `actions` in order, starting from `initial`, and return the final
/// state.
pub fn fold_actions<I>(
    initial: GameState,
    actions: I,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> GameState
where
    I: IntoIterator<Item = Action>,
{
    actions
        .into_iter()
        .fold(initial, |state, action| apply(&state, action, config, rng))
}

/// Like [`fold_actions`] but keeps every intermediate state: one per action.
pub fn scan_actions<I>(
    initial: GameState,
    actions: I,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> Vec<GameState>
where
    I: IntoIterator<Item = Action>,
{
    let mut state = initial;
    actions
        .into_iter()
        .map(|action| {
            state = apply(&state, action, config, rng);
            state.clone()
        })
        .collect()
}

// ── Merging ──────────────────────────────────────────────────────────────────

/// Merges the tick pulse and the command channel into one total order.
///
/// When both a command and a pulse are ready, the command goes first.
/// Once the command channel disconnects the stream reports [`Event::Quit`].
pub struct ActionStream {
    ticker: Receiver<Instant>,
    commands: Receiver<Command>,
    interval: Duration,
}

impl ActionStream {
    pub fn new(commands: Receiver<Command>, interval: Duration) -> Self {
        ActionStream {
            ticker: tick(interval),
            commands,
            interval,
        }
    }

    /// Block until the next event.
    pub fn next(&self) -> Event {
        if let Some(event) = self.try_command() {
            return event;
        }
        select! {
            recv(self.commands) -> cmd => match cmd {
                Ok(cmd) => cmd.into(),
                Err(_) => Event::Quit,
            },
            recv(self.ticker) -> _ => Event::Act(Action::Tick),
        }
    }

    /// Like [`next`](Self::next) but gives up after `timeout`.
    pub fn next_timeout(&self, timeout: Duration) -> Option<Event> {
        if let Some(event) = self.try_command() {
            return Some(event);
        }
        select! {
            recv(self.commands) -> cmd => Some(match cmd {
                Ok(cmd) => cmd.into(),
                Err(_) => Event::Quit,
            }),
            recv(self.ticker) -> _ => Some(Event::Act(Action::Tick)),
            default(timeout) => None,
        }
    }

    /// Wait only for a command; used while the game is over and ticks are
    /// meaningless.
    pub fn next_command(&self, timeout: Duration) -> Option<Event> {
        match self.commands.recv_timeout(timeout) {
            Ok(cmd) => Some(cmd.into()),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(Event::Quit),
        }
    }

    /// Start a fresh timeline: new ticker, and any flaps still queued from
    /// the previous attempt are dropped.  Quit requests are kept.
    pub fn restart(&mut self) -> Option<Event> {
        self.ticker = tick(self.interval);
        let mut dropped = 0;
        loop {
            match self.commands.try_recv() {
                Ok(Command::Quit) | Err(TryRecvError::Disconnected) => return Some(Event::Quit),
                Ok(_) => dropped += 1,
                Err(TryRecvError::Empty) => break,
            }
        }
        if dropped > 0 {
            debug!("Dropped {dropped} stale commands on restart");
        }
        None
    }

    fn try_command(&self) -> Option<Event> {
        match self.commands.try_recv() {
            Ok(cmd) => Some(cmd.into()),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Event::Quit),
        }
    }
}
