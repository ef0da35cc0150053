//! Piper subprocess synthesizer.
//!
//! One job is one process: `<binary> --model <model> --output_file <-|path>`
//! with the text on stdin. Audio comes back on stdout (`-`) or is read from
//! the output file once the process exits successfully.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use ttsd_core::config::ServiceConfig;
use ttsd_core::paths;
use ttsd_core::{SynthesisError, SynthesisJob, SynthesisOutput, Synthesizer};

use crate::shutdown::terminate;

/// Output target understood by Piper as "write WAV to stdout".
const STDOUT_TARGET: &str = "-";

/// How to launch the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PiperConfig {
    pub binary: PathBuf,
    pub model: PathBuf,
    pub extra_args: Vec<String>,
    /// Wall-clock ceiling for one invocation, from spawn until the output
    /// pipes are drained.
    pub timeout: Duration,
    /// SIGTERM → SIGKILL grace on timeout or cancellation.
    pub kill_grace: Duration,
}

impl PiperConfig {
    pub fn from_service_config(config: &ServiceConfig) -> Self {
        Self {
            binary: config.assets.piper_bin.clone(),
            model: config.assets.voice_model.clone(),
            extra_args: config.synthesis.extra_args.clone(),
            timeout: config.synthesis.timeout,
            kill_grace: config.synthesis.kill_grace,
        }
    }
}

/// [`Synthesizer`] backed by the Piper executable.
#[derive(Debug, Clone)]
pub struct PiperSynthesizer {
    config: PiperConfig,
}

/// Everything the engine left behind once it exited and its pipes closed.
struct Finished {
    status: io::Result<ExitStatus>,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

enum Ended {
    Finished(Finished),
    TimedOut,
    Cancelled,
}

impl PiperSynthesizer {
    pub const fn new(config: PiperConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &PiperConfig {
        &self.config
    }

    fn command(&self, job: &SynthesisJob) -> Command {
        let target = match &job.output {
            SynthesisOutput::Stdout => PathBuf::from(STDOUT_TARGET),
            SynthesisOutput::File(path) => path.clone(),
        };

        let mut cmd = Command::new(&self.config.binary);
        cmd.arg("--model")
            .arg(&self.config.model)
            .arg("--output_file")
            .arg(target)
            .args(&self.config.extra_args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    fn spawn(&self, job: &SynthesisJob) -> Result<Child, SynthesisError> {
        self.command(job).spawn().map_err(|e| {
            SynthesisError::process(format!(
                "failed to launch {}: {e}",
                self.config.binary.display()
            ))
        })
    }

    /// Stop a child that overran or whose caller went away.
    async fn abandon(&self, child: &mut Child, io_tasks: &[AbortHandle], created: Option<&Path>) {
        if let Err(e) = terminate(child, self.config.kill_grace).await {
            warn!(error = %e, "Failed to terminate synthesis process");
        }
        for task in io_tasks {
            task.abort();
        }
        if let Some(path) = created {
            remove_partial(path).await;
        }
    }
}

#[async_trait]
impl Synthesizer for PiperSynthesizer {
    async fn synthesize(
        &self,
        job: SynthesisJob,
        cancel: CancellationToken,
    ) -> Result<Vec<u8>, SynthesisError> {
        let output_file = job.output_path().cloned();
        if let Some(parent) = output_file.as_deref().and_then(Path::parent) {
            if !parent.as_os_str().is_empty() {
                paths::ensure_directory(parent)
                    .await
                    .map_err(|e| SynthesisError::process(e.to_string()))?;
            }
        }

        // Only a file this run creates is ours to clean up on failure.
        let created = match output_file.as_deref() {
            Some(path) if !tokio::fs::try_exists(path).await.unwrap_or(true) => Some(path),
            _ => None,
        };

        let deadline = Instant::now() + self.config.timeout;
        let mut child = self.spawn(&job)?;
        debug!(
            pid = ?child.id(),
            chars = job.text.len(),
            output = ?output_file,
            "Spawned synthesis process"
        );

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let stdin = child.stdin.take();

        let stdout_task = tokio::spawn(read_to_end(stdout));
        let stderr_task = tokio::spawn(read_to_end(stderr));
        let text = job.text.into_bytes();
        let stdin_task = tokio::spawn(async move {
            let Some(mut stdin) = stdin else { return };
            if let Err(e) = stdin.write_all(&text).await {
                // The engine may exit before draining stdin; its exit status decides.
                if e.kind() != io::ErrorKind::BrokenPipe {
                    debug!(error = %e, "Failed to write synthesis input");
                }
            }
            // Dropping stdin closes the pipe so the engine sees EOF.
        });

        let io_tasks = [
            stdin_task.abort_handle(),
            stdout_task.abort_handle(),
            stderr_task.abort_handle(),
        ];

        // The deadline covers both the exit and the pipe drain: a descendant
        // holding stdout open must not outlive it.
        let ended = tokio::select! {
            finished = finish(&mut child, stdin_task, stdout_task, stderr_task) => {
                Ended::Finished(finished)
            }
            () = tokio::time::sleep_until(deadline) => Ended::TimedOut,
            () = cancel.cancelled() => Ended::Cancelled,
        };

        let Finished {
            status,
            stdout,
            stderr: stderr_buf,
        } = match ended {
            Ended::Finished(finished) => finished,
            Ended::TimedOut => {
                warn!(
                    pid = ?child.id(),
                    after = ?self.config.timeout,
                    "Synthesis deadline exceeded"
                );
                self.abandon(&mut child, &io_tasks, created).await;
                return Err(SynthesisError::Timeout {
                    after: self.config.timeout,
                });
            }
            Ended::Cancelled => {
                debug!(pid = ?child.id(), "Synthesis cancelled by caller");
                self.abandon(&mut child, &io_tasks, created).await;
                return Err(SynthesisError::Cancelled);
            }
        };

        let status = status.map_err(|e| SynthesisError::process(format!("wait failed: {e}")))?;
        let stderr_text = String::from_utf8_lossy(&stderr_buf).trim().to_string();

        if !status.success() {
            if let Some(path) = created {
                remove_partial(path).await;
            }
            return Err(SynthesisError::ProcessFailure {
                reason: format!("engine exited with {status}"),
                stderr: stderr_text,
            });
        }

        let audio = match output_file.as_deref() {
            None => stdout,
            Some(path) => tokio::fs::read(path).await.map_err(|e| {
                SynthesisError::ProcessFailure {
                    reason: format!("cannot read output {}: {e}", path.display()),
                    stderr: stderr_text.clone(),
                }
            })?,
        };

        if audio.is_empty() {
            return Err(SynthesisError::ProcessFailure {
                reason: "engine produced no audio".to_string(),
                stderr: stderr_text,
            });
        }

        Ok(audio)
    }
}

/// Wait for the engine to exit and for every pipe task to finish.
async fn finish(
    child: &mut Child,
    stdin_task: JoinHandle<()>,
    stdout_task: JoinHandle<Vec<u8>>,
    stderr_task: JoinHandle<Vec<u8>>,
) -> Finished {
    let status = child.wait().await;
    let _ = stdin_task.await;
    let stdout = stdout_task.await.unwrap_or_default();
    let stderr = stderr_task.await.unwrap_or_default();
    Finished {
        status,
        stdout,
        stderr,
    }
}

async fn read_to_end<R>(reader: Option<R>) -> Vec<u8>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    if let Some(mut reader) = reader {
        let _ = reader.read_to_end(&mut buf).await;
    }
    buf
}

async fn remove_partial(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!(path = %path.display(), "Removed partial output"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove partial output"),
    }
}
