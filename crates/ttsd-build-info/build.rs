use std::{
    env,
    path::{Path, PathBuf},
};

use vergen_gix::{Emitter, GixBuilder};

fn main() {
    // Always rerun when this build script changes.
    println!("cargo:rerun-if-changed=build.rs");

    // Packagers stamp the build date; there is no reliable way to derive it here.
    println!("cargo:rerun-if-env-changed=TTSD_BUILD_DATE");
    let build_date = env::var("TTSD_BUILD_DATE")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=TTSD_BUILD_DATE={build_date}");

    // Allow CI or packagers to provide git data without any git probing.
    println!("cargo:rerun-if-env-changed=TTSD_BUILD_SHA_SHORT");
    println!("cargo:rerun-if-env-changed=TTSD_BUILD_BRANCH");

    if let Some(override_sha) = env::var("TTSD_BUILD_SHA_SHORT")
        .ok()
        .and_then(|s| normalize_sha_short(&s))
    {
        let branch = env::var("TTSD_BUILD_BRANCH").ok();
        emit_vergen_fallbacks(Some(&override_sha), branch.as_deref());
        return;
    }

    // Best-effort git probing via vergen-gix, but NEVER fail the build.
    // If no repo is found, we emit explicit fallbacks so `env!()` never fails.
    let Some(repo_root) = find_repo_root(Path::new(
        &env::var("CARGO_MANIFEST_DIR").unwrap_or_default(),
    )) else {
        emit_vergen_fallbacks(None, None);
        return;
    };

    let git = match GixBuilder::default()
        .repo_path(Some(repo_root))
        .branch(true)
        .sha(true) // short SHA
        .build()
    {
        Ok(git) => git,
        Err(err) => {
            println!("cargo:warning=ttsd-build-info: vergen-gix config failed: {err}");
            emit_vergen_fallbacks(None, None);
            return;
        }
    };

    if let Err(err) = Emitter::default()
        .add_instructions(&git)
        .and_then(|e| e.emit())
    {
        println!("cargo:warning=ttsd-build-info: vergen-gix emit failed: {err}");
        emit_vergen_fallbacks(None, None);
    }
}

fn emit_vergen_fallbacks(sha_short: Option<&str>, branch: Option<&str>) {
    // These are the env vars the crate uses via `env!()`.
    // They MUST always be set, or compilation will fail.
    let sha = sha_short.unwrap_or("unknown");
    let branch = branch
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .unwrap_or("unknown");
    println!("cargo:rustc-env=VERGEN_GIT_SHA={sha}");
    println!("cargo:rustc-env=VERGEN_GIT_BRANCH={branch}");
}

fn normalize_sha_short(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let candidate = if trimmed.len() >= 7 {
        &trimmed[..7]
    } else {
        trimmed
    };

    if candidate.len() == 7 && candidate.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(candidate.to_string())
    } else {
        None
    }
}

fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.join(".git").exists() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}
