use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Permanently deletes a directory tree. There is no trash fallback.
pub fn remove(path: &Path) -> Result<()> {
    fs::remove_dir_all(path).with_context(|| format!("failed to remove {}", path.display()))
}
