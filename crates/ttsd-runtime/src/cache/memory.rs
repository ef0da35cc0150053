//! In-process audio cache with per-entry expiry.
//!
//! Suitable for a single node. Expired entries are dropped lazily on read and
//! when the store is full.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use ttsd_core::{AudioCache, CacheError};

struct Entry {
    audio: Vec<u8>,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// [`AudioCache`] held in memory.
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
    max_entries: usize,
}

impl MemoryCache {
    /// Create a cache holding at most `max_entries` entries (`0` means unbounded).
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_entries,
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    fn make_room(entries: &mut HashMap<String, Entry>, max_entries: usize, now: Instant) {
        entries.retain(|_, entry| !entry.is_expired(now));
        while entries.len() >= max_entries {
            let Some(oldest) = entries
                .iter()
                .min_by_key(|(_, entry)| entry.expires_at)
                .map(|(key, _)| key.clone())
            else {
                break;
            };
            debug!(key = %oldest, "Evicting audio cache entry");
            entries.remove(&oldest);
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(0)
    }
}

#[async_trait]
impl AudioCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.audio.clone())),
                Some(_) => {}
            }
        }

        // Expired: drop it unless a writer refreshed it in between.
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|entry| entry.is_expired(now)) {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError> {
        let now = Instant::now();
        let expires_at = now
            .checked_add(ttl)
            .ok_or_else(|| CacheError::Unavailable(format!("ttl {ttl:?} out of range")))?;

        let mut entries = self.entries.write().await;
        if self.max_entries > 0 && !entries.contains_key(key) {
            Self::make_room(&mut entries, self.max_entries, now);
        }
        entries.insert(
            key.to_string(),
            Entry {
                audio: value.to_vec(),
                expires_at,
            },
        );
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
