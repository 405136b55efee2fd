//! Whole-file I/O for dependency files
//!
//! Reads are plain whole-file reads. Writes replace the target atomically:
//! content goes to a uniquely named, locked temp file next to the target, is
//! synced, then renamed over it. A failed write leaves the previous file
//! intact and removes the temp file.

use crate::{Error, Result};
use fs2::FileExt;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::Builder;

/// Replace `path` with `content` atomically.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;

    // Same directory as the target so the rename never crosses filesystems.
    let mut temp = Builder::new()
        .prefix(".depman-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| Error::io(dir, e))?;

    temp.as_file()
        .lock_exclusive()
        .map_err(|_| Error::LockFailed {
            path: path.to_path_buf(),
        })?;

    temp.write_all(content)
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|e| Error::io(temp.path(), e))?;

    FileExt::unlock(temp.as_file()).map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })?;

    temp.persist(path).map_err(|e| Error::io(path, e.error))?;

    tracing::debug!(path = %path.display(), bytes = content.len(), "Replaced file");
    Ok(())
}

/// Read a UTF-8 text file in full.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Replace a text file atomically.
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}
