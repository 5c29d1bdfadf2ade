//! Expansion of command-line inputs into the files to convert.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

/// Files are kept as given; a directory contributes its files whose
/// extension matches `extension` (case-insensitively), sorted by name.
/// Directories are not searched recursively.
pub fn discover_inputs(inputs: &[PathBuf], extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let found = list_directory(input, extension)?;
            debug!(dir = %input.display(), files = found.len(), "expanded input directory");
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }
    Ok(files)
}

fn list_directory(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).with_context(|| format!("read directory {}", dir.display()))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("read directory {}", dir.display()))?
            .path();
        if path.is_file() && has_extension(&path, extension) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(std::ffi::OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}
