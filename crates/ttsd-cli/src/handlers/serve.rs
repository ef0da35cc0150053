//! `ttsd serve`

use std::collections::HashMap;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::info;
use ttsd_axum::{ServerConfig, shutdown_signal, start_server};
use ttsd_core::{BuildIdentity, ServiceConfig};

use crate::parser::Cli;

/// Build identity of this binary.
pub fn build_identity() -> BuildIdentity {
    BuildIdentity {
        semver: ttsd_build_info::SEMVER.to_string(),
        branch: ttsd_build_info::GIT_BRANCH.to_string(),
        commit: ttsd_build_info::GIT_SHA_SHORT.to_string(),
        build_date: ttsd_build_info::BUILD_DATE.to_string(),
        arch: ttsd_build_info::ARCH.to_string(),
    }
}

/// Resolve configuration: CLI flags first, then the environment.
pub fn resolve_config<F>(cli: &Cli, env: F) -> Result<ServiceConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let overrides: HashMap<&str, String> = cli.overrides().into_iter().collect();
    ServiceConfig::from_lookup(|key| overrides.get(key).cloned().or_else(|| env(key)))
        .context("invalid configuration")
}

/// Run the service until Ctrl-C or SIGTERM.
pub async fn execute(cli: &Cli) -> Result<()> {
    let service = resolve_config(cli, |key| std::env::var(key).ok())?;
    let config = ServerConfig {
        service,
        identity: build_identity(),
    };

    let shutdown = CancellationToken::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        trigger.cancel();
    });

    info!(version = %ttsd_build_info::full_version(), "Starting ttsd");
    start_server(config, shutdown).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn env(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_string())
        }
    }

    #[test]
    fn flags_override_environment() {
        let cli = Cli::parse_from(["ttsd", "--port", "9300"]);
        let config = resolve_config(
            &cli,
            env(&[("PORT", "9100"), ("TTSD_DATA_DIR", "/data")]),
        )
        .unwrap();
        assert_eq!(config.port, 9300);
    }

    #[test]
    fn environment_applies_without_flags() {
        let cli = Cli::parse_from(["ttsd"]);
        let config = resolve_config(
            &cli,
            env(&[("PORT", "9100"), ("TTSD_DATA_DIR", "/data")]),
        )
        .unwrap();
        assert_eq!(config.port, 9100);
        assert_eq!(
            config.assets.piper_bin,
            std::path::PathBuf::from("/data/bin/piper/piper")
        );
    }

    #[test]
    fn invalid_environment_is_an_error() {
        let cli = Cli::parse_from(["ttsd"]);
        let err = resolve_config(
            &cli,
            env(&[("TTSD_OUTPUT_MODE", "mp3"), ("TTSD_DATA_DIR", "/data")]),
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("TTSD_OUTPUT_MODE"));
    }

    #[test]
    fn identity_matches_build_info() {
        assert_eq!(build_identity().full(), ttsd_build_info::full_version());
    }
}
