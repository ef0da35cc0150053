//! Service configuration.
//!
//! Everything is read from environment variables (after `.env` has been
//! loaded by the binary). Parsing goes through a lookup closure so tests can
//! feed a plain map instead of mutating the process environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::domain::OutputMode;
use crate::paths::{self, PathError};

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8200;

/// Default wall-clock ceiling for one synthesis run.
pub const DEFAULT_SYNTH_TIMEOUT: Duration = Duration::from_secs(120);

/// Default SIGTERM→SIGKILL grace when terminating the engine.
pub const DEFAULT_KILL_GRACE: Duration = Duration::from_millis(500);

/// Default cache entry lifetime (48 hours).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(48 * 60 * 60);

/// Default cap on in-process cache entries.
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 1024;

/// Default Redis server for `TTSD_CACHE=redis`.
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Default bound on one round trip to an external cache.
pub const DEFAULT_CACHE_TIMEOUT: Duration = Duration::from_millis(500);

/// Default interval between asset checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Default number of asset checks before giving up (~2 minutes).
pub const DEFAULT_POLL_ATTEMPTS: u32 = 60;

/// Configuration errors, each naming the offending variable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var}: invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Path(#[from] PathError),
}

/// Which cache backend to construct at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    /// Caching disabled; every request synthesizes.
    None,
    /// In-process TTL store.
    Memory,
    /// Shared Redis server.
    Redis,
}

/// Paths that must exist before the service reports ready.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    pub piper_bin: PathBuf,
    pub voice_model: PathBuf,
    pub voice_config: PathBuf,
}

impl AssetPaths {
    /// Every path the readiness poller waits for.
    pub fn required(&self) -> Vec<PathBuf> {
        vec![
            self.piper_bin.clone(),
            self.voice_model.clone(),
            self.voice_config.clone(),
        ]
    }
}

/// Engine invocation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisSettings {
    pub output_mode: OutputMode,
    pub output_dir: PathBuf,
    pub timeout: Duration,
    pub kill_grace: Duration,
    pub extra_args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    pub backend: CacheBackend,
    pub ttl: Duration,
    /// Entry cap for the memory backend.
    pub max_entries: usize,
    /// Server URL for the Redis backend.
    pub redis_url: String,
    /// Bound on one Redis round trip.
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadinessSettings {
    pub poll_interval: Duration,
    pub max_attempts: u32,
}

/// Complete service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub assets: AssetPaths,
    pub synthesis: SynthesisSettings,
    pub cache: CacheSettings,
    pub readiness: ReadinessSettings,
    /// Bearer token required on every route except `/health`. `None` disables auth.
    pub api_token: Option<String>,
    /// Allowed CORS origins. `None` allows any origin.
    pub cors_origins: Option<Vec<String>>,
}

impl ServiceConfig {
    /// Defaults rooted at `data_root`.
    pub fn with_defaults(data_root: &std::path::Path) -> Self {
        let voice_model = paths::default_voice_model(data_root);
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            assets: AssetPaths {
                piper_bin: paths::default_piper_bin(data_root),
                voice_config: paths::voice_config_for(&voice_model),
                voice_model,
            },
            synthesis: SynthesisSettings {
                output_mode: OutputMode::Stream,
                output_dir: paths::default_output_dir(data_root),
                timeout: DEFAULT_SYNTH_TIMEOUT,
                kill_grace: DEFAULT_KILL_GRACE,
                extra_args: Vec::new(),
            },
            cache: CacheSettings {
                backend: CacheBackend::Memory,
                ttl: DEFAULT_CACHE_TTL,
                max_entries: DEFAULT_CACHE_MAX_ENTRIES,
                redis_url: DEFAULT_REDIS_URL.to_string(),
                timeout: DEFAULT_CACHE_TIMEOUT,
            },
            readiness: ReadinessSettings {
                poll_interval: DEFAULT_POLL_INTERVAL,
                max_attempts: DEFAULT_POLL_ATTEMPTS,
            },
            api_token: None,
            cors_origins: None,
        }
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let data_root = paths::data_root(&lookup)?;
        let mut config = Self::with_defaults(&data_root);

        if let Some(raw) = get("PORT") {
            config.port = parse_var("PORT", &raw)?;
        }
        if let Some(raw) = get("TTSD_BIND_ADDR") {
            config.bind_addr = parse_var("TTSD_BIND_ADDR", &raw)?;
        }

        if let Some(raw) = get("TTSD_PIPER_BIN") {
            config.assets.piper_bin = paths::normalize_user_path(&raw)?;
        }
        if let Some(raw) = get("TTSD_VOICE_MODEL") {
            config.assets.voice_model = paths::normalize_user_path(&raw)?;
            config.assets.voice_config = paths::voice_config_for(&config.assets.voice_model);
        }
        if let Some(raw) = get("TTSD_VOICE_CONFIG") {
            config.assets.voice_config = paths::normalize_user_path(&raw)?;
        }

        if let Some(raw) = get("TTSD_OUTPUT_MODE") {
            config.synthesis.output_mode = raw.parse().map_err(|reason| ConfigError::Invalid {
                var: "TTSD_OUTPUT_MODE",
                value: raw.clone(),
                reason,
            })?;
        }
        if let Some(raw) = get("TTSD_OUTPUT_DIR") {
            config.synthesis.output_dir = paths::normalize_user_path(&raw)?;
        }
        if let Some(raw) = get("TTSD_SYNTH_TIMEOUT_SECS") {
            let secs: u64 = parse_var("TTSD_SYNTH_TIMEOUT_SECS", &raw)?;
            config.synthesis.timeout =
                nonzero_duration("TTSD_SYNTH_TIMEOUT_SECS", &raw, Duration::from_secs(secs))?;
        }
        if let Some(raw) = get("TTSD_KILL_GRACE_MS") {
            config.synthesis.kill_grace =
                Duration::from_millis(parse_var("TTSD_KILL_GRACE_MS", &raw)?);
        }
        if let Some(raw) = get("TTSD_EXTRA_ARGS") {
            config.synthesis.extra_args = raw.split_whitespace().map(str::to_string).collect();
        }

        if let Some(raw) = get("TTSD_CACHE") {
            config.cache.backend = match raw.to_ascii_lowercase().as_str() {
                "memory" => CacheBackend::Memory,
                "redis" => CacheBackend::Redis,
                "none" | "off" | "disabled" => CacheBackend::None,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "TTSD_CACHE",
                        value: raw,
                        reason: "expected memory, redis or none".to_string(),
                    });
                }
            };
        }
        if let Some(raw) = get("TTSD_CACHE_TTL_SECS") {
            let secs: u64 = parse_var("TTSD_CACHE_TTL_SECS", &raw)?;
            config.cache.ttl =
                nonzero_duration("TTSD_CACHE_TTL_SECS", &raw, Duration::from_secs(secs))?;
        }
        if let Some(raw) = get("TTSD_CACHE_MAX_ENTRIES") {
            config.cache.max_entries = parse_var("TTSD_CACHE_MAX_ENTRIES", &raw)?;
        }
        if let Some(raw) = get("TTSD_REDIS_URL") {
            config.cache.redis_url = raw;
        }
        if let Some(raw) = get("TTSD_CACHE_TIMEOUT_MS") {
            let ms: u64 = parse_var("TTSD_CACHE_TIMEOUT_MS", &raw)?;
            config.cache.timeout =
                nonzero_duration("TTSD_CACHE_TIMEOUT_MS", &raw, Duration::from_millis(ms))?;
        }

        if let Some(raw) = get("TTSD_ASSET_POLL_INTERVAL_MS") {
            let ms: u64 = parse_var("TTSD_ASSET_POLL_INTERVAL_MS", &raw)?;
            config.readiness.poll_interval = nonzero_duration(
                "TTSD_ASSET_POLL_INTERVAL_MS",
                &raw,
                Duration::from_millis(ms),
            )?;
        }
        if let Some(raw) = get("TTSD_ASSET_POLL_ATTEMPTS") {
            config.readiness.max_attempts = parse_var("TTSD_ASSET_POLL_ATTEMPTS", &raw)?;
            if config.readiness.max_attempts == 0 {
                return Err(ConfigError::Invalid {
                    var: "TTSD_ASSET_POLL_ATTEMPTS",
                    value: raw,
                    reason: "must be at least 1".to_string(),
                });
            }
        }

        config.api_token = get("TTSD_API_TOKEN");
        config.cors_origins = get("TTSD_CORS_ORIGINS").map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect()
        });

        Ok(config)
    }

    /// Address the HTTP listener binds to.
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

fn parse_var<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn nonzero_duration(
    var: &'static str,
    raw: &str,
    value: Duration,
) -> Result<Duration, ConfigError> {
    if value.is_zero() {
        return Err(ConfigError::Invalid {
            var,
            value: raw.to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(value)
}
