//! Redis-backed audio cache.
//!
//! Entries are written with `SETEX`, so expiry is owned by the server. The
//! connection is opened on first use and re-used through a
//! [`ConnectionManager`], which reconnects on its own after a drop. Every
//! command is bounded by a timeout; a slow or absent server reads as
//! [`CacheError::Unavailable`], which callers treat as a miss.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, RedisError};
use tokio::sync::OnceCell;
use tokio::time::timeout;
use tracing::debug;

use ttsd_core::{AudioCache, CacheError};

/// [`AudioCache`] stored in Redis.
pub struct RedisCache {
    client: Client,
    connection: OnceCell<ConnectionManager>,
    command_timeout: Duration,
}

impl RedisCache {
    /// Prepare a cache for `url`. Only the URL is checked here; the server is
    /// contacted on the first command. `command_timeout` bounds each round
    /// trip, connection setup included.
    pub fn open(url: &str, command_timeout: Duration) -> Result<Self, CacheError> {
        let client = Client::open(url).map_err(unavailable)?;
        Ok(Self {
            client,
            connection: OnceCell::new(),
            command_timeout,
        })
    }

    async fn connection(&self) -> Result<ConnectionManager, CacheError> {
        let manager = self
            .connection
            .get_or_try_init(|| async {
                let manager = ConnectionManager::new(self.client.clone()).await?;
                debug!("Connected to Redis audio cache");
                Ok::<_, RedisError>(manager)
            })
            .await
            .map_err(unavailable)?;
        Ok(manager.clone())
    }

    async fn bounded<T, F>(&self, op: &'static str, fut: F) -> Result<T, CacheError>
    where
        F: Future<Output = Result<T, CacheError>>,
    {
        timeout(self.command_timeout, fut).await.map_err(|_| {
            CacheError::Unavailable(format!(
                "redis {op} timed out after {:?}",
                self.command_timeout
            ))
        })?
    }
}

#[async_trait]
impl AudioCache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.bounded("GET", async {
            let mut conn = self.connection().await?;
            let audio: Option<Vec<u8>> = conn.get(key).await.map_err(unavailable)?;
            Ok(audio.filter(|bytes| !bytes.is_empty()))
        })
        .await
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError> {
        // SETEX rejects 0 and has whole-second resolution.
        let seconds = ttl.as_secs().max(1);
        self.bounded("SETEX", async {
            let mut conn = self.connection().await?;
            conn.set_ex::<_, _, ()>(key, value, seconds)
                .await
                .map_err(unavailable)
        })
        .await
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}

#[allow(clippy::needless_pass_by_value)]
fn unavailable(e: RedisError) -> CacheError {
    CacheError::Unavailable(e.to_string())
}
