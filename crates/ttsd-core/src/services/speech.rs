//! Speech generation service - readiness gate, cache, and synthesis.
//!
//! The service owns the request path for `/generate` and knows nothing about
//! HTTP or processes: it talks to the cache and the engine through ports and
//! returns a [`GenerateOutcome`] the adapter turns into a response.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::domain::{GenerateRequest, OutputMode, RequestError, SynthesisJob};
use crate::latch::AtomicLatch;
use crate::ports::{AudioCache, SynthesisError, Synthesizer};

/// Why a generation request produced no audio.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Required assets have not been confirmed yet.
    #[error("speech engine is still initializing")]
    NotReady,

    #[error("invalid request: {0}")]
    InvalidRequest(#[from] RequestError),

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
}

/// Successful result of a generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// Audio bytes for the response body.
    Audio { bytes: Vec<u8>, cached: bool },
    /// Audio was written to `path` by the engine.
    File { path: PathBuf },
}

/// Deployment settings the service needs per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechSettings {
    pub output_mode: OutputMode,
    pub output_dir: PathBuf,
    pub cache_ttl: Duration,
}

/// Orchestrates one `/generate` call.
pub struct SpeechService {
    ready: Arc<AtomicLatch>,
    cache: Arc<dyn AudioCache>,
    synthesizer: Arc<dyn Synthesizer>,
    settings: SpeechSettings,
}

impl SpeechService {
    pub fn new(
        ready: Arc<AtomicLatch>,
        cache: Arc<dyn AudioCache>,
        synthesizer: Arc<dyn Synthesizer>,
        settings: SpeechSettings,
    ) -> Self {
        Self {
            ready,
            cache,
            synthesizer,
            settings,
        }
    }

    /// Whether the readiness gate is set.
    pub fn is_ready(&self) -> bool {
        self.ready.is_set()
    }

    pub const fn output_mode(&self) -> OutputMode {
        self.settings.output_mode
    }

    /// Gate, parse, then generate.
    ///
    /// Readiness is checked before the body is looked at, so an unready
    /// service answers `NotReady` even for malformed input.
    pub async fn generate_from_body(&self, body: &[u8]) -> Result<GenerateOutcome, GenerateError> {
        if !self.is_ready() {
            return Err(GenerateError::NotReady);
        }
        let request = GenerateRequest::from_json(body).inspect_err(|e| {
            debug!(error = %e, "Rejected generate request body");
        })?;
        self.generate(request).await
    }

    /// Serve `request` from the cache or the engine.
    pub async fn generate(
        &self,
        request: GenerateRequest,
    ) -> Result<GenerateOutcome, GenerateError> {
        if !self.is_ready() {
            return Err(GenerateError::NotReady);
        }
        if request.text.is_empty() {
            return Err(RequestError::EmptyText.into());
        }

        let key = request.cache_key();
        match self.cache.get(&key).await {
            Ok(Some(bytes)) => {
                debug!(key = %key, size = bytes.len(), "Audio cache hit");
                return Ok(GenerateOutcome::Audio {
                    bytes,
                    cached: true,
                });
            }
            Ok(None) => debug!(key = %key, "Audio cache miss"),
            Err(e) => warn!(
                key = %key,
                backend = self.cache.backend(),
                error = %e,
                "Audio cache read failed, synthesizing"
            ),
        }

        if let Some(language) = request.language.as_deref() {
            debug!(language, "Language hint ignored by process engine");
        }

        let job = self.job_for(&request);
        let file_path = job.output_path().cloned();
        let bytes = self.run(job).await?;

        if let Err(e) = self.cache.set(&key, &bytes, self.settings.cache_ttl).await {
            warn!(
                key = %key,
                backend = self.cache.backend(),
                error = %e,
                "Audio cache write failed"
            );
        }

        Ok(match file_path {
            Some(path) => GenerateOutcome::File { path },
            None => GenerateOutcome::Audio {
                bytes,
                cached: false,
            },
        })
    }

    fn job_for(&self, request: &GenerateRequest) -> SynthesisJob {
        match self.settings.output_mode {
            OutputMode::Stream => {
                if let Some(path) = &request.output_path {
                    debug!(path = %path.display(), "output_path ignored in stream mode");
                }
                SynthesisJob::to_stdout(request.text.clone())
            }
            OutputMode::File => {
                let path = request.output_path.clone().unwrap_or_else(|| {
                    self.settings
                        .output_dir
                        .join(format!("{}.wav", Uuid::new_v4()))
                });
                SynthesisJob::to_file(request.text.clone(), path)
            }
        }
    }

    /// Run `job` on its own task.
    ///
    /// The token's drop guard lives in this future: if the caller drops it
    /// (client disconnect) the token fires and the engine terminates the child.
    async fn run(&self, job: SynthesisJob) -> Result<Vec<u8>, SynthesisError> {
        let cancel = CancellationToken::new();
        let _guard = cancel.clone().drop_guard();
        let synthesizer = Arc::clone(&self.synthesizer);

        let handle = tokio::spawn(async move { synthesizer.synthesize(job, cancel).await });

        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(SynthesisError::process(format!("synthesis task failed: {e}"))),
        };

        match &result {
            Ok(bytes) => debug!(size = bytes.len(), "Synthesis complete"),
            Err(SynthesisError::Cancelled) => debug!("Synthesis cancelled"),
            Err(SynthesisError::ProcessFailure { reason, stderr }) => error!(
                kind = "process_failure",
                reason = %reason,
                stderr = %stderr,
                "Synthesis failed"
            ),
            Err(e) => error!(kind = e.kind(), error = %e, "Synthesis failed"),
        }
        result
    }
}
