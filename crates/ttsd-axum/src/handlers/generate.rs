//! Speech generation handler.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use tracing::debug;
use ttsd_core::GenerateOutcome;

use crate::dto::FilePathResponse;
use crate::error::HttpError;
use crate::state::AppState;

pub const AUDIO_CONTENT_TYPE: &str = "audio/wav";

/// `POST /generate`
///
/// The body is taken raw so readiness can be checked before it is parsed.
/// If the client disconnects, dropping this future cancels the engine.
pub async fn generate(State(state): State<AppState>, body: Bytes) -> Result<Response, HttpError> {
    match state.speech.generate_from_body(&body).await? {
        GenerateOutcome::Audio { bytes, cached } => {
            debug!(size = bytes.len(), cached, "Returning audio");
            Ok(([(header::CONTENT_TYPE, AUDIO_CONTENT_TYPE)], bytes).into_response())
        }
        GenerateOutcome::File { path } => Ok(Json(FilePathResponse {
            file_path: path.display().to_string(),
        })
        .into_response()),
    }
}
