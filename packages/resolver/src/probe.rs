//! Runtime environment probe for the headless browser.
//!
//! Discovers the browser executable and profile-asset directory once at
//! process start; the resolution engine itself never touches the
//! environment.

use std::path::{Path, PathBuf};

use tracing::info;

/// Explicit browser executable override.
pub const EXECUTABLE_ENV: &str = "BROWSER_EXECUTABLE_PATH";

/// Directory for the browser's persistent assets.
pub const CACHE_DIR_ENV: &str = "BROWSER_CACHE_DIR";

/// Well-known container installation paths, probed in order when no
/// explicit executable is configured.
const WELL_KNOWN_EXECUTABLES: &[&str] = &[
    "/usr/bin/chromium-browser",
    "/usr/bin/chromium",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/google-chrome",
];

/// Well-known hosting-platform cache location.
const WELL_KNOWN_CACHE_DIRS: &[&str] = &["/opt/render/.cache/chromium"];

/// Resolved browser runtime environment.
///
/// `None` fields let the browser library use its own detection.
#[derive(Debug, Clone, Default)]
pub struct BrowserRuntime {
    /// Path to the Chrome/Chromium executable
    pub executable: Option<PathBuf>,

    /// Profile/asset directory for the browser
    pub user_data_dir: Option<PathBuf>,
}

/// Probe the process environment and filesystem for a usable browser
/// runtime. Call once at startup.
pub fn probe() -> BrowserRuntime {
    let executable = std::env::var(EXECUTABLE_ENV)
        .ok()
        .map(PathBuf::from)
        .or_else(|| first_existing(WELL_KNOWN_EXECUTABLES));

    if let Some(path) = &executable {
        info!(path = %path.display(), "using browser executable");
    }

    let user_data_dir = std::env::var(CACHE_DIR_ENV)
        .ok()
        .map(PathBuf::from)
        .or_else(|| first_existing(WELL_KNOWN_CACHE_DIRS));

    if let Some(dir) = &user_data_dir {
        info!(dir = %dir.display(), "using browser cache dir");
    }

    BrowserRuntime {
        executable,
        user_data_dir,
    }
}

fn first_existing(candidates: &[&str]) -> Option<PathBuf> {
    candidates
        .iter()
        .map(Path::new)
        .find(|p| p.exists())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_existing_picks_earliest_match() {
        let dir = std::env::temp_dir();
        let present = dir.join("probe-test-present");
        std::fs::write(&present, b"x").unwrap();

        let missing = dir.join("probe-test-missing");
        let candidates = [
            missing.to_str().unwrap().to_string(),
            present.to_str().unwrap().to_string(),
        ];
        let refs: Vec<&str> = candidates.iter().map(String::as_str).collect();

        assert_eq!(first_existing(&refs), Some(present.clone()));
        std::fs::remove_file(&present).unwrap();
    }

    #[test]
    fn test_first_existing_none_when_all_missing() {
        assert_eq!(
            first_existing(&["/nonexistent/a", "/nonexistent/b"]),
            None
        );
    }
}
