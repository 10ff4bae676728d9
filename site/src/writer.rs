//! Writes site output files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

/// Writes content to a file, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if directories cannot be created or the file cannot be written.
pub fn write(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create directory: {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Cannot write file: {}", path.display()))?;
    Ok(())
}

/// Copies every file under `from` into `to`, keeping relative paths.
/// Returns the written paths. A missing `from` copies nothing.
///
/// # Errors
///
/// Returns an error if a file cannot be read or written.
pub fn copy_tree(from: &Path, to: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    if !from.is_dir() {
        return Ok(written);
    }
    for entry in WalkDir::new(from).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Cannot list {}", from.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(from)?;
        let target = to.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create directory: {}", parent.display()))?;
        }
        fs::copy(entry.path(), &target)
            .with_context(|| format!("Cannot copy {}", entry.path().display()))?;
        written.push(target);
    }
    Ok(written)
}
