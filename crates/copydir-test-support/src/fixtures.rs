//! Scratch directories and tree builders.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::TempDir;

/// Prefix applied to every scratch directory created by the fixtures.
pub const SCRATCH_PREFIX: &str = "copydir-";

/// Create a fresh scratch directory that is removed when dropped.
///
/// # Errors
///
/// Returns an error if the temporary directory cannot be created.
pub fn scratch_dir() -> Result<TempDir> {
    tempfile::Builder::new()
        .prefix(SCRATCH_PREFIX)
        .tempdir()
        .context("failed to create scratch directory")
}

/// Write `entries` under `root`, creating parent directories as needed.
///
/// Each entry is a `/`-separated relative path and its file contents. A path
/// ending in `/` creates an empty directory and ignores the contents.
///
/// # Errors
///
/// Returns an error if a directory or file cannot be written.
pub fn write_tree(root: &Path, entries: &[(&str, &[u8])]) -> Result<()> {
    fs::create_dir_all(root).with_context(|| format!("failed to create {}", root.display()))?;
    for (relative, contents) in entries {
        let path = root.join(relative);
        if relative.ends_with('/') {
            fs::create_dir_all(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            continue;
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
}
