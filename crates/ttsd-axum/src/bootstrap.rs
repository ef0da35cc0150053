//! Axum server bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the HTTP adapter. All concrete implementations are instantiated here.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use ttsd_core::paths::ensure_directory;
use ttsd_core::{
    AtomicLatch, AudioCache, BuildIdentity, CacheBackend, NoopCache, OutputMode, ResourceProbe,
    ServiceConfig, SpeechService, SpeechSettings, StatusService, Synthesizer,
};
use ttsd_runtime::{
    MemoryCache, PiperConfig, PiperSynthesizer, RedisCache, SysinfoResourceProbe,
    wait_for_assets,
};

use crate::routes::{CorsConfig, RouterConfig, create_router};

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub service: ServiceConfig,
    pub identity: BuildIdentity,
}

impl ServerConfig {
    pub fn router_config(&self) -> RouterConfig {
        RouterConfig {
            cors: CorsConfig::from_origins(self.service.cors_origins.clone()),
            api_token: self.service.api_token.clone(),
        }
    }
}

/// Application context for the Axum adapter.
pub struct AxumContext {
    /// Generation path: readiness gate, cache, engine.
    pub speech: Arc<SpeechService>,
    /// `/service` report builder.
    pub status: Arc<StatusService>,
    /// Readiness latch shared by both services; set by the asset poller.
    pub ready: Arc<AtomicLatch>,
}

impl AxumContext {
    /// Wire services around already-built adapters.
    pub fn new(
        cache: Arc<dyn AudioCache>,
        synthesizer: Arc<dyn Synthesizer>,
        probe: Arc<dyn ResourceProbe>,
        settings: SpeechSettings,
        identity: &BuildIdentity,
    ) -> Self {
        let ready = Arc::new(AtomicLatch::new());
        let speech = SpeechService::new(Arc::clone(&ready), cache, synthesizer, settings);
        let status = StatusService::new(Arc::clone(&ready), probe, identity);
        Self {
            speech: Arc::new(speech),
            status: Arc::new(status),
            ready,
        }
    }
}

/// Build the production adapters from configuration.
pub async fn bootstrap(config: &ServerConfig) -> Result<AxumContext> {
    let service = &config.service;

    info!(
        piper_bin = %service.assets.piper_bin.display(),
        voice_model = %service.assets.voice_model.display(),
        voice_config = %service.assets.voice_config.display(),
        output_mode = %service.synthesis.output_mode,
        timeout = ?service.synthesis.timeout,
        "Resolved TTS engine configuration"
    );

    if service.synthesis.output_mode == OutputMode::File {
        if let Err(e) = ensure_directory(&service.synthesis.output_dir).await {
            warn!(error = %e, "Output directory not ready, will retry per request");
        }
    }

    let cache: Arc<dyn AudioCache> = match service.cache.backend {
        CacheBackend::Memory => Arc::new(MemoryCache::new(service.cache.max_entries)),
        CacheBackend::Redis => Arc::new(
            RedisCache::open(&service.cache.redis_url, service.cache.timeout)
                .context("invalid TTSD_REDIS_URL")?,
        ),
        CacheBackend::None => Arc::new(NoopCache),
    };
    info!(
        backend = cache.backend(),
        ttl = ?service.cache.ttl,
        "Audio cache configured"
    );

    let synthesizer = Arc::new(PiperSynthesizer::new(PiperConfig::from_service_config(
        service,
    )));

    Ok(AxumContext::new(
        cache,
        synthesizer,
        Arc::new(SysinfoResourceProbe::new()),
        SpeechSettings {
            output_mode: service.synthesis.output_mode,
            output_dir: service.synthesis.output_dir.clone(),
            cache_ttl: service.cache.ttl,
        },
        &config.identity,
    ))
}

/// Start the web server and run until `shutdown` fires.
///
/// The listener is bound before the asset poller has confirmed anything, so
/// orchestrators can probe `/health` from the first moment.
pub async fn start_server(config: ServerConfig, shutdown: CancellationToken) -> Result<()> {
    let ctx = bootstrap(&config).await?;
    let service = &config.service;

    tokio::spawn(wait_for_assets(
        service.assets.required(),
        service.readiness.poll_interval,
        service.readiness.max_attempts,
        Arc::clone(&ctx.ready),
        shutdown.child_token(),
    ));

    let router_config = config.router_config();
    let app = create_router(ctx, &router_config);

    let addr = service.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(
        version = %config.identity.full(),
        auth_enabled = router_config.api_token.is_some(),
        "ttsd listening on http://{}",
        addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;

    info!("ttsd shut down");
    Ok(())
}

/// Resolve once Ctrl-C or (on unix) SIGTERM arrives.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl-C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
