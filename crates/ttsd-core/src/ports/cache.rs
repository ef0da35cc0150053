//! Audio cache port.
//!
//! The cache is optional infrastructure. Callers always go through the trait;
//! when caching is disabled they get [`NoopCache`], which reports a miss for
//! every key and accepts every write.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by a cache backend.
///
/// Never surfaced to HTTP callers: the dispatcher treats any of these as a
/// miss on read and logs them on write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// The backend could not be reached or refused the operation.
    #[error("cache unavailable: {0}")]
    Unavailable(String),

    /// The backend answered but the entry could not be used.
    #[error("cache entry unusable: {0}")]
    Corrupt(String),
}

/// Key-value store for synthesized audio.
#[async_trait]
pub trait AudioCache: Send + Sync {
    /// Fetch the audio stored under `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store `value` under `key` for at most `ttl`.
    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError>;

    /// Short backend name for logs and startup diagnostics.
    fn backend(&self) -> &'static str;
}

/// Cache that stores nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

#[async_trait]
impl AudioCache for NoopCache {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &[u8], _ttl: Duration) -> Result<(), CacheError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "none"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_cache_always_misses() {
        let cache = NoopCache;
        cache
            .set("tts:cache:abc", b"RIFF", Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(cache.get("tts:cache:abc").await.unwrap(), None);
    }
}
