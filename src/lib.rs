// Library surface for the engine and its front ends; main.rs only wires the terminal.
pub mod app_dirs;
pub mod best;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod history;
pub mod input;
pub mod language;
pub mod metrics;
pub mod runtime;
pub mod samples;
pub mod session;
pub mod ui;

pub use engine::{Engine, EngineOptions};
pub use events::{FinishPayload, SessionObserver, TickPayload, TokenState};
pub use session::{Lifecycle, Mode};
