//! Output file placement and atomic writes.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ConvertError, Result};

/// `<dest>/<name lower-cased>.<extension>`; `dest` must be an existing folder.
pub fn output_path(dest: &Path, name: &str, extension: &str) -> Result<PathBuf> {
    if !dest.is_dir() {
        return Err(ConvertError::DestinationNotFound {
            path: dest.to_path_buf(),
        });
    }
    Ok(dest.join(format!("{}.{extension}", name.to_lowercase())))
}

/// Write `path` through a sibling `.tmp` file renamed into place on success.
///
/// On failure the temporary file is removed and `path` is left untouched.
pub fn write_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut File) -> Result<()>,
{
    let tmp = tmp_path(path);
    let result = write_then_rename(path, &tmp, write);
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn write_then_rename<F>(path: &Path, tmp: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut File) -> Result<()>,
{
    let mut file = File::create(tmp).map_err(|e| ConvertError::io("create", tmp, e))?;
    write(&mut file)?;
    file.sync_all()
        .map_err(|e| ConvertError::io("sync", tmp, e))?;
    drop(file);
    fs::rename(tmp, path).map_err(|e| ConvertError::io("rename", path, e))?;
    debug!(path = %path.display(), "wrote output file");
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
