//! Synthesis engine adapters.

mod piper;

pub use piper::{PiperConfig, PiperSynthesizer};
