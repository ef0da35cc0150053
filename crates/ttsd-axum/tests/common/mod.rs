//! Shared fixtures for ttsd-axum integration tests.
//!
//! The engine is replaced by [`StubSynthesizer`], which counts invocations so
//! tests can assert that gated or cached requests never reach it.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use axum::response::Response;
use http_body_util::BodyExt;
use tokio_util::sync::CancellationToken;
use ttsd_axum::{AxumContext, RouterConfig, create_router};
use ttsd_core::{
    AtomicLatch, AudioCache, BuildIdentity, NoopResourceProbe, OutputMode, SpeechSettings,
    SynthesisError, SynthesisJob, Synthesizer,
};
use ttsd_runtime::MemoryCache;

/// Audio the stub returns for every successful job.
pub const FAKE_WAV: &[u8] = b"RIFF\x24\x00\x00\x00WAVEfmt ";

#[derive(Default)]
pub struct StubSynthesizer {
    calls: AtomicUsize,
    fail: bool,
}

impl StubSynthesizer {
    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Synthesizer for StubSynthesizer {
    async fn synthesize(
        &self,
        job: SynthesisJob,
        _cancel: CancellationToken,
    ) -> Result<Vec<u8>, SynthesisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SynthesisError::ProcessFailure {
                reason: "engine exited with exit status: 1".to_string(),
                stderr: "/secret/voices/model.onnx: no such file".to_string(),
            });
        }
        if let Some(path) = job.output_path() {
            tokio::fs::write(path, FAKE_WAV)
                .await
                .map_err(|e| SynthesisError::process(e.to_string()))?;
        }
        Ok(FAKE_WAV.to_vec())
    }
}

/// A router plus handles to the pieces tests poke at.
pub struct TestApp {
    pub router: Router,
    pub ready: Arc<AtomicLatch>,
    pub synth: Arc<StubSynthesizer>,
}

pub struct TestAppBuilder {
    mode: OutputMode,
    output_dir: PathBuf,
    synth: StubSynthesizer,
    router: RouterConfig,
    cache: Option<Arc<dyn AudioCache>>,
    ready: bool,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            mode: OutputMode::Stream,
            output_dir: std::env::temp_dir(),
            synth: StubSynthesizer::default(),
            router: RouterConfig::default(),
            cache: None,
            ready: true,
        }
    }

    pub fn not_ready(mut self) -> Self {
        self.ready = false;
        self
    }

    pub fn file_mode(mut self, output_dir: PathBuf) -> Self {
        self.mode = OutputMode::File;
        self.output_dir = output_dir;
        self
    }

    pub fn failing_engine(mut self) -> Self {
        self.synth = StubSynthesizer::failing();
        self
    }

    pub fn cache(mut self, cache: Arc<dyn AudioCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn api_token(mut self, token: &str) -> Self {
        self.router.api_token = Some(token.to_string());
        self
    }

    pub fn build(self) -> TestApp {
        let synth = Arc::new(self.synth);
        let cache = self
            .cache
            .unwrap_or_else(|| Arc::new(MemoryCache::new(16)));
        let ctx = AxumContext::new(
            cache,
            synth.clone(),
            Arc::new(NoopResourceProbe),
            SpeechSettings {
                output_mode: self.mode,
                output_dir: self.output_dir,
                cache_ttl: Duration::from_secs(60),
            },
            &test_identity(),
        );
        if self.ready {
            ctx.ready.set();
        }
        let ready = Arc::clone(&ctx.ready);
        TestApp {
            router: create_router(ctx, &self.router),
            ready,
            synth,
        }
    }
}

pub fn test_identity() -> BuildIdentity {
    BuildIdentity {
        semver: "0.3.1".to_string(),
        branch: "main".to_string(),
        commit: "abc1234".to_string(),
        build_date: "2026-01-01".to_string(),
        arch: "x86_64".to_string(),
    }
}

pub fn generate_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let body = body_bytes(response).await;
    serde_json::from_slice(&body).unwrap_or_else(|e| panic!("Expected valid JSON body: {e}"))
}

pub fn content_type(response: &Response) -> String {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}
