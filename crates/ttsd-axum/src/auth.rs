//! Optional bearer-token authentication.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::Request;
use axum::http::{HeaderValue, StatusCode, header};
use axum::middleware::Next;
use axum::response::Response;

/// Check `Authorization` against `expected`, the full `"Bearer <token>"` value.
///
/// Returns 401 with `WWW-Authenticate: Bearer` on a missing or wrong token.
pub async fn validate_bearer(expected: Arc<str>, req: Request, next: Next) -> Response {
    let auth = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    if auth == Some(expected.as_ref()) {
        return next.run(req).await;
    }

    tracing::warn!(
        path = %req.uri().path(),
        "Unauthorized request - missing or invalid token"
    );
    let mut res = Response::new(Body::empty());
    *res.status_mut() = StatusCode::UNAUTHORIZED;
    res.headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    res
}

/// Precompute the header value so the check never allocates.
pub fn expected_header(token: &str) -> Arc<str> {
    Arc::from(format!("Bearer {token}"))
}
