//! Path utilities for locating workspace files from tests.

use std::io::Write;
use std::path::PathBuf;

/// Returns the workspace root directory.
///
/// This is determined by walking up from the test-utils manifest directory.
pub fn workspace_root() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent() // crates/
        .and_then(|p| p.parent()) // workspace root
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(manifest_dir))
}

/// Returns the directory holding the bundled configuration files.
pub fn config_dir() -> PathBuf {
    workspace_root().join("config")
}

/// Searches for a configuration file.
///
/// Checks `ICECOVER_CONFIG_DIR` (if set) first, then the workspace
/// `config/` directory.
pub fn find_config_file(name: &str) -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(dir) = std::env::var("ICECOVER_CONFIG_DIR") {
        candidates.push(PathBuf::from(dir).join(name));
    }
    candidates.push(config_dir().join(name));

    candidates.into_iter().find(|path| path.exists())
}

/// Creates a temporary directory for test output.
///
/// The directory is automatically cleaned up when the returned `TempDir` is dropped.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary test directory")
}

/// Writes `contents` to a named temporary file with the given extension.
pub fn write_temp_file(contents: &str, suffix: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temporary file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write temporary file");
    file
}
