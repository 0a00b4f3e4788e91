//! The conversation engine — a per-user state machine that collects one
//! emotion-log entry across six prompt/reply exchanges.

pub mod engine;
pub mod prompts;
pub mod session;
pub mod step;

pub use engine::DialogEngine;
pub use session::{Draft, Session, SessionStore};
pub use step::{InvalidInput, Step, StepValue};
