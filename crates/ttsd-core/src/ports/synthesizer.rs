//! Synthesis invoker port.
//!
//! This port defines the interface for turning text into audio by running an
//! external engine. Implementations own every process detail (binary path,
//! arguments, stdio plumbing, termination) and report outcomes through
//! [`SynthesisError`].

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::domain::SynthesisJob;

/// Why a synthesis invocation produced no audio.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    /// The engine did not finish before the deadline and was terminated.
    #[error("synthesis timed out after {after:?}")]
    Timeout { after: Duration },

    /// The engine could not be launched, exited non-zero, or produced no audio.
    ///
    /// `stderr` is kept for server-side diagnostics only.
    #[error("synthesis process failed: {reason}")]
    ProcessFailure { reason: String, stderr: String },

    /// The caller went away before the engine finished.
    #[error("synthesis cancelled")]
    Cancelled,
}

impl SynthesisError {
    /// Process failure with no captured stderr.
    pub fn process(reason: impl Into<String>) -> Self {
        Self::ProcessFailure {
            reason: reason.into(),
            stderr: String::new(),
        }
    }

    /// Stable discriminant for structured logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "timeout",
            Self::ProcessFailure { .. } => "process_failure",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Runs one synthesis job to completion.
///
/// Calls are independent; implementations must tolerate any number of
/// concurrent invocations and must not deduplicate identical jobs.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Synthesize `job`, honouring `cancel` and the implementation's deadline.
    ///
    /// On `Ok` the returned bytes are the complete audio. No partial output is
    /// ever returned as success.
    async fn synthesize(
        &self,
        job: SynthesisJob,
        cancel: CancellationToken,
    ) -> Result<Vec<u8>, SynthesisError>;
}
