//! Shared test utilities for integration tests.
//!
//! Import from integration test files as:
//! ```ignore
//! mod common;
//! ```

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Initialize tracing for tests, respecting RUST_LOG env var.
///
/// Safe to call multiple times — subsequent calls are no-ops.
#[allow(dead_code)]
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// Write `(relative path, content)` pairs under a fresh vault directory.
///
/// Returns the vault root (e.g. `<temp_dir>/vault/`).
#[allow(dead_code)]
pub fn write_vault(temp_dir: &TempDir, notes: &[(&str, &str)]) -> PathBuf {
    let root = temp_dir.path().join("vault");
    std::fs::create_dir(&root).unwrap();
    for (path, content) in notes {
        let full = root.join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full, content).unwrap();
    }
    root
}

/// Write a settings file next to the vault and return its path.
#[allow(dead_code)]
pub fn write_settings(temp_dir: &TempDir, toml_text: &str) -> PathBuf {
    let path = temp_dir.path().join("stemma.toml");
    std::fs::write(&path, toml_text).unwrap();
    path
}

#[allow(dead_code)]
pub fn read_note(root: &Path, rel: &str) -> String {
    std::fs::read_to_string(root.join(rel)).unwrap()
}
