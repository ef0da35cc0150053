//! Path utilities for ttsd data directories and engine assets.
//!
//! This module provides the canonical path resolution for:
//! - The data root (everything else hangs off it)
//! - The synthesis binary and voice assets
//! - The output directory used in file mode
//!
//! Resolution functions take an env lookup closure instead of reading the
//! process environment directly, so tests never mutate global state.

mod error;

use std::path::{Path, PathBuf};

pub use error::PathError;

/// Env var overriding the data root.
pub const DATA_DIR_ENV: &str = "TTSD_DATA_DIR";

/// Data root directory name under the user's home when no override is set.
pub const DEFAULT_DATA_DIR_NAME: &str = "Dexter";

/// Voice model shipped by the default provisioning step.
pub const DEFAULT_VOICE_MODEL: &str = "en_GB-northern_english_male-medium.onnx";

/// Get the root directory for engine assets and generated audio.
///
/// Resolution order:
/// 1. `TTSD_DATA_DIR` (highest priority; blank counts as unset)
/// 2. `~/Dexter`
pub fn data_root<F>(lookup: F) -> Result<PathBuf, PathError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(DATA_DIR_ENV).filter(|v| !v.trim().is_empty()) {
        return normalize_user_path(&raw);
    }

    let home = dirs::home_dir().ok_or(PathError::NoHomeDir)?;
    Ok(home.join(DEFAULT_DATA_DIR_NAME))
}

/// Default synthesis binary: `<data>/bin/piper/piper`.
pub fn default_piper_bin(data_root: &Path) -> PathBuf {
    data_root.join("bin").join("piper").join("piper")
}

/// Default voice model: `<data>/models/piper/<DEFAULT_VOICE_MODEL>`.
pub fn default_voice_model(data_root: &Path) -> PathBuf {
    data_root.join("models").join("piper").join(DEFAULT_VOICE_MODEL)
}

/// Voice config sidecar: the model path with `.json` appended.
pub fn voice_config_for(model: &Path) -> PathBuf {
    let mut raw = model.as_os_str().to_owned();
    raw.push(".json");
    PathBuf::from(raw)
}

/// Default output directory for file mode: `<data>/tts/output`.
pub fn default_output_dir(data_root: &Path) -> PathBuf {
    data_root.join("tts").join("output")
}

/// Normalize a user-provided path, expanding a leading `~`.
pub fn normalize_user_path(raw: &str) -> Result<PathBuf, PathError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PathError::EmptyPath);
    }

    if trimmed == "~" {
        return dirs::home_dir().ok_or(PathError::NoHomeDir);
    }
    if let Some(rest) = trimmed.strip_prefix("~/") {
        let home = dirs::home_dir().ok_or(PathError::NoHomeDir)?;
        return Ok(home.join(rest));
    }

    Ok(PathBuf::from(trimmed))
}

/// Create `dir` (and parents) if missing.
pub async fn ensure_directory(dir: &Path) -> Result<(), PathError> {
    match tokio::fs::metadata(dir).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(PathError::NotADirectory(dir.to_path_buf())),
        Err(_) => tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| PathError::CreateFailed {
                path: dir.to_path_buf(),
                reason: e.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn data_root_prefers_env_override() {
        let root = data_root(|k| (k == DATA_DIR_ENV).then(|| "/srv/tts".to_string())).unwrap();
        assert_eq!(root, PathBuf::from("/srv/tts"));
    }

    #[test]
    fn data_root_treats_blank_override_as_unset() {
        let blank = data_root(|_| Some("   ".to_string()));
        assert!(!matches!(blank, Err(PathError::EmptyPath)));
        assert_eq!(blank.ok(), data_root(|_| None).ok());
    }

    #[test]
    fn default_asset_layout() {
        let root = PathBuf::from("/data");
        assert_eq!(
            default_piper_bin(&root),
            PathBuf::from("/data/bin/piper/piper")
        );
        let model = default_voice_model(&root);
        assert_eq!(
            model,
            PathBuf::from("/data/models/piper/en_GB-northern_english_male-medium.onnx")
        );
        assert_eq!(
            voice_config_for(&model),
            PathBuf::from("/data/models/piper/en_GB-northern_english_male-medium.onnx.json")
        );
        assert_eq!(default_output_dir(&root), PathBuf::from("/data/tts/output"));
    }

    #[test]
    fn tilde_expands_to_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(normalize_user_path("~/voices").unwrap(), home.join("voices"));
        }
    }

    #[tokio::test]
    async fn ensure_directory_creates_nested_dirs() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a").join("b");
        ensure_directory(&nested).await.unwrap();
        assert!(nested.is_dir());
        // Second call is a no-op.
        ensure_directory(&nested).await.unwrap();
    }

    #[tokio::test]
    async fn ensure_directory_rejects_files() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("f");
        std::fs::write(&file, b"x").unwrap();
        let err = ensure_directory(&file).await.unwrap_err();
        assert!(matches!(err, PathError::NotADirectory(_)));
    }
}
