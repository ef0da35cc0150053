//! Core services - request orchestration over the ports.
//!
//! Services here are pure orchestrators: they hold `Arc<dyn Port>` handles
//! and never know which adapter sits behind them.

mod speech;
mod status;

pub use speech::{GenerateError, GenerateOutcome, SpeechService, SpeechSettings};
pub use status::StatusService;
