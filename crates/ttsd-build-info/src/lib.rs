//! Build/version metadata shared across ttsd frontends.

/// The `SemVer` version of the build (from Cargo).
pub const SEMVER: &str = env!("CARGO_PKG_VERSION");

/// The git SHA emitted by the build script.
///
/// This is expected to be a 7-character hex string when available; otherwise it
/// is set to `"unknown"`.
pub const GIT_SHA_SHORT: &str = env!("VERGEN_GIT_SHA");

/// The git branch the build was produced from, or `"unknown"`.
pub const GIT_BRANCH: &str = env!("VERGEN_GIT_BRANCH");

/// Build date stamped by the packager through `TTSD_BUILD_DATE`, or `"unknown"`.
pub const BUILD_DATE: &str = env!("TTSD_BUILD_DATE");

/// Target architecture of this binary.
pub const ARCH: &str = std::env::consts::ARCH;

/// True if the git SHA looks like a short hex hash.
pub const HAS_GIT_SHA: bool = is_short_hex(GIT_SHA_SHORT);

/// The “nice” version string used by CLI `--version` output.
///
/// Examples:
/// - `0.3.1 (a1b2c3d)`
/// - `0.3.1` (when git data is unavailable)
pub const LONG_VERSION_WITH_SHA: &str =
    concat!(env!("CARGO_PKG_VERSION"), " (", env!("VERGEN_GIT_SHA"), ")");

pub const LONG_VERSION: &str = if HAS_GIT_SHA {
    LONG_VERSION_WITH_SHA
} else {
    SEMVER
};

/// Dotted identifier printed by `ttsd version` and reported by `/service`.
///
/// Format: `<semver>.<branch>.<commit>.<build_date>.<arch>`.
pub fn full_version() -> String {
    format!("{SEMVER}.{GIT_BRANCH}.{GIT_SHA_SHORT}.{BUILD_DATE}.{ARCH}")
}

const fn is_short_hex(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != 7 {
        return false;
    }

    let mut i = 0;
    while i < 7 {
        let c = bytes[i];
        let is_digit = c >= b'0' && c <= b'9';
        let is_lower = c >= b'a' && c <= b'f';
        let is_upper = c >= b'A' && c <= b'F';
        if !(is_digit || is_lower || is_upper) {
            return false;
        }
        i += 1;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_version_joins_all_identifiers() {
        let version = full_version();
        assert!(version.starts_with(SEMVER));
        assert!(version.contains(GIT_SHA_SHORT));
        assert!(version.contains(BUILD_DATE));
        assert!(version.ends_with(ARCH));
    }

    #[test]
    fn short_hex_detection() {
        assert!(is_short_hex("a1b2c3d"));
        assert!(!is_short_hex("unknown"));
        assert!(!is_short_hex("a1b2c3"));
    }
}
