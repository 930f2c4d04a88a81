//! Notifications the engine pushes to its observers.
//!
//! Every notification is delivered synchronously, in subscription order,
//! before the engine call that caused it returns.

use serde::Serialize;
use std::fmt;

use crate::session::Mode;

/// Payload of a countdown tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TickPayload {
    pub time_left: u64,
    pub elapsed: u64,
    pub wpm: u32,
}

/// Final scores of a finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinishPayload {
    pub wpm: u32,
    pub accuracy: u32,
    pub raw_speed: u32,
    pub consistency: u32,
    pub elapsed: u64,
    pub mode: Mode,
    pub time_limit: u32,
    /// wpm samples for the results graph, oldest first
    pub history: Vec<u32>,
}

/// Per-position state of the active token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CharState {
    Correct,
    Incorrect,
    /// typed past the end of the target
    Extra,
    /// not typed yet
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenState {
    pub target: String,
    pub typed: String,
    pub per_char: Vec<CharState>,
    pub is_complete: bool,
}

/// Receiver of engine notifications. Every hook defaults to doing nothing.
pub trait SessionObserver {
    fn on_start(&mut self) {}
    fn on_tick(&mut self, _tick: &TickPayload) {}
    fn on_finish(&mut self, _result: &FinishPayload) {}
    fn on_current_token_change(&mut self, _token: &TokenState) {}
}

/// Handle returned by subscribe, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

#[derive(Default)]
pub(crate) struct Observers {
    next_id: u64,
    entries: Vec<(ObserverId, Box<dyn SessionObserver>)>,
}

impl Observers {
    pub(crate) fn subscribe(&mut self, observer: Box<dyn SessionObserver>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, observer));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn start(&mut self) {
        for (_, observer) in self.entries.iter_mut() {
            observer.on_start();
        }
    }

    pub(crate) fn tick(&mut self, tick: &TickPayload) {
        for (_, observer) in self.entries.iter_mut() {
            observer.on_tick(tick);
        }
    }

    pub(crate) fn finish(&mut self, result: &FinishPayload) {
        for (_, observer) in self.entries.iter_mut() {
            observer.on_finish(result);
        }
    }

    pub(crate) fn token(&mut self, token: &TokenState) {
        for (_, observer) in self.entries.iter_mut() {
            observer.on_current_token_change(token);
        }
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.len())
            .finish()
    }
}
