//! Response bodies that exist only at the HTTP boundary.

use serde::Serialize;

/// Body returned by `/generate` in file output mode.
#[derive(Debug, Clone, Serialize)]
pub struct FilePathResponse {
    pub file_path: String,
}

/// Body returned by `/hibernate` and `/wakeup`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LifecycleResponse {
    pub status: &'static str,
    pub message: &'static str,
}

impl LifecycleResponse {
    pub const fn ok(message: &'static str) -> Self {
        Self {
            status: "ok",
            message,
        }
    }
}
