use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::samples::SampleHistory;

/// Character that commits the active token.
pub const SEPARATOR: char = ' ';

pub const DEFAULT_TIME_LIMIT: u32 = 60;
pub const MAX_TIME_LIMIT: u32 = 3600;
pub const DEFAULT_SEED_SIZE: usize = 200;
pub const MAX_SEED_SIZE: usize = 5000;

/// What kind of tokens the word source produces
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(from = "String", into = "String")]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    /// plain dictionary words
    #[default]
    Words,
    /// random integers
    Numbers,
    /// fragments of bundled quotes
    Quote,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Words, Mode::Numbers, Mode::Quote];

    /// Parse a mode name, falling back to the default for anything unknown.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "words" | "word" | "plain" | "plain-text" | "text" => Mode::Words,
            "numbers" | "number" | "numeric" => Mode::Numbers,
            "quote" | "quotes" | "quote-fragment" => Mode::Quote,
            other => {
                tracing::debug!(mode = other, "unknown mode, using default");
                Mode::default()
            }
        }
    }

    /// Next mode in [`Mode::ALL`], wrapping around.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl From<String> for Mode {
    fn from(name: String) -> Self {
        Mode::from_name(&name)
    }
}

impl From<Mode> for String {
    fn from(mode: Mode) -> Self {
        mode.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Idle,
    Running,
    Finished,
}

/// Result of one committed (or abandoned) token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenOutcome {
    pub target: String,
    pub typed: String,
    pub correct_count: usize,
    pub is_exact_match: bool,
}

pub fn clamp_time_limit(secs: u32) -> u32 {
    secs.clamp(1, MAX_TIME_LIMIT)
}

pub fn clamp_seed_size(count: usize) -> usize {
    count.clamp(1, MAX_SEED_SIZE)
}

/// All state of a single run, rebuilt on every reset
#[derive(Debug, Clone)]
pub struct Session {
    pub mode: Mode,
    pub time_limit: u32,
    pub words: Vec<String>,
    pub current_index: usize,
    pub current_input: String,
    pub lifecycle: Lifecycle,
    pub started_at: Option<Duration>,
    pub ended_at: Option<Duration>,
    pub typed_chars: usize,
    pub correct_chars: usize,
    pub token_history: Vec<TokenOutcome>,
    pub samples: SampleHistory,
}

impl Session {
    pub fn new(mode: Mode, time_limit: u32, words: Vec<String>) -> Self {
        Self {
            mode,
            time_limit: clamp_time_limit(time_limit),
            words,
            current_index: 0,
            current_input: String::new(),
            lifecycle: Lifecycle::Idle,
            started_at: None,
            ended_at: None,
            typed_chars: 0,
            correct_chars: 0,
            token_history: Vec::new(),
            samples: SampleHistory::with_baseline(),
        }
    }

    /// Token the cursor points at; empty once the cursor is past the last word.
    pub fn current_target(&self) -> &str {
        self.words
            .get(self.current_index)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Whole seconds since start, frozen at the end once finished.
    pub fn elapsed_seconds(&self, now: Duration) -> u64 {
        match (self.started_at, self.ended_at) {
            (Some(start), Some(end)) => end.saturating_sub(start).as_secs(),
            (Some(start), None) => now.saturating_sub(start).as_secs(),
            _ => 0,
        }
    }

    pub fn time_left(&self, now: Duration) -> u64 {
        u64::from(self.time_limit).saturating_sub(self.elapsed_seconds(now))
    }

    pub fn is_idle(&self) -> bool {
        self.lifecycle == Lifecycle::Idle
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    pub fn is_finished(&self) -> bool {
        self.lifecycle == Lifecycle::Finished
    }
}
