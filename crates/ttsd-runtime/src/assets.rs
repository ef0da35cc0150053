//! Startup asset poller.
//!
//! Waits for the engine binary and voice files to appear on disk, then sets
//! the readiness latch. It runs once per process and never re-checks after
//! success.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use ttsd_core::AtomicLatch;

/// How the poller finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetPollOutcome {
    /// Every path existed; the latch is set.
    Ready { attempts: u32 },
    /// Attempts ran out. The service stays unready until restarted.
    Exhausted { missing: Vec<PathBuf> },
    /// Shutdown began before the assets appeared.
    Cancelled,
}

/// Poll `paths` until all exist, then set `latch`.
///
/// The first check runs immediately, then once per `poll_interval`, for at
/// most `max_attempts` checks in total.
pub async fn wait_for_assets(
    paths: Vec<PathBuf>,
    poll_interval: Duration,
    max_attempts: u32,
    latch: Arc<AtomicLatch>,
    cancel: CancellationToken,
) -> AssetPollOutcome {
    let mut ticker = interval(poll_interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut missing = paths.clone();
    for attempt in 1..=max_attempts.max(1) {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!("Asset poller stopped by shutdown");
                return AssetPollOutcome::Cancelled;
            }
            _ = ticker.tick() => {}
        }

        missing = missing_paths(&paths).await;
        if missing.is_empty() {
            if latch.set() {
                info!(attempts = attempt, "TTS assets present, engine ready");
            }
            return AssetPollOutcome::Ready { attempts: attempt };
        }
        debug!(attempt, missing = missing.len(), "Waiting for TTS assets");
    }

    warn!(
        attempts = max_attempts,
        missing = ?missing,
        "TTS assets not found, service will stay unready until restarted"
    );
    AssetPollOutcome::Exhausted { missing }
}

async fn missing_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut missing = Vec::new();
    for path in paths {
        if !exists(path).await {
            missing.push(path.clone());
        }
    }
    missing
}

async fn exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}
