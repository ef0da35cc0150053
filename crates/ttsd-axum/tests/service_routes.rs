//! Integration tests for `/health`, `/hibernate`, `/wakeup`, and `/service`.

mod common;

use axum::http::StatusCode;
use tower::ServiceExt;

use common::{TestAppBuilder, body_bytes, body_json, content_type, get, post};

#[tokio::test]
async fn health_reports_initializing_then_ok() {
    let app = TestAppBuilder::new().not_ready().build();

    let response = app.router.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_bytes(response).await, b"initializing");

    app.ready.set();

    let response = app.router.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(content_type(&response).starts_with("text/plain"));
    assert_eq!(body_bytes(response).await, b"OK");
}

#[tokio::test]
async fn hibernate_acknowledges() {
    let app = TestAppBuilder::new().build();

    let response = app.router.clone().oneshot(post("/hibernate")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json, serde_json::json!({"status": "ok", "message": "process-idle"}));
}

#[tokio::test]
async fn wakeup_acknowledges() {
    let app = TestAppBuilder::new().not_ready().build();

    let response = app.router.clone().oneshot(post("/wakeup")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json, serde_json::json!({"status": "ok", "message": "ready"}));
}

#[tokio::test]
async fn lifecycle_routes_reject_get() {
    let app = TestAppBuilder::new().build();

    for uri in ["/hibernate", "/wakeup", "/generate"] {
        let response = app.router.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{uri}");
    }
}

#[tokio::test]
async fn service_report_has_expected_shape() {
    let app = TestAppBuilder::new().not_ready().build();

    let response = app.router.clone().oneshot(get("/service")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    assert_eq!(json["version"]["str"], "0.3.1.main.abc1234.2026-01-01.x86_64");
    let obj = &json["version"]["obj"];
    assert_eq!(obj["major"], "0");
    assert_eq!(obj["minor"], "3");
    assert_eq!(obj["patch"], "1");
    assert_eq!(obj["branch"], "main");
    assert_eq!(obj["commit"], "abc1234");
    assert_eq!(obj["build_date"], "2026-01-01");
    assert_eq!(obj["arch"], "x86_64");

    assert_eq!(json["health"]["status"], "INITIALIZING");
    assert!(json["health"]["uptime"].as_str().unwrap().ends_with('s'));
    assert!(json["metrics"]["cpu"]["avg"].is_number());
    assert!(json["metrics"]["memory"]["avg"].is_number());
}

#[tokio::test]
async fn service_report_tracks_readiness() {
    let app = TestAppBuilder::new().not_ready().build();
    app.ready.set();

    let response = app.router.clone().oneshot(get("/service")).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json["health"]["status"], "OK");
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = TestAppBuilder::new().build();

    let response = app.router.clone().oneshot(get("/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
