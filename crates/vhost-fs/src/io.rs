//! Atomic I/O operations with file locking

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};

use fs2::FileExt;

use crate::{Error, NormalizedPath, Result};

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename so readers never observe a partial file.
/// An advisory lock is held on the temp file while writing. The temp file is
/// removed again if any step before the rename fails.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let native_path = path.to_native();

    if let Some(parent) = native_path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_name = format!(
        ".{}.{}.tmp",
        native_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = native_path.with_file_name(&temp_name);

    let written = (|| {
        let mut temp_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(|e| Error::io(&temp_path, e))?;

        temp_file.lock_exclusive().map_err(|_| Error::LockFailed {
            path: native_path.clone(),
        })?;

        temp_file
            .write_all(content)
            .map_err(|e| Error::io(&temp_path, e))?;

        temp_file
            .sync_all()
            .map_err(|e| Error::io(&temp_path, e))?;

        temp_file.unlock().map_err(|_| Error::LockFailed {
            path: native_path.clone(),
        })
    })();

    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    fs::rename(&temp_path, &native_path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        Error::io(&native_path, e)
    })
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Read text content, mapping a missing file to `None`.
pub fn read_optional_text(path: &NormalizedPath) -> Result<Option<String>> {
    match read_text(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Write text content to a file atomically.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}

/// Remove a file or symlink. Returns whether anything was removed.
pub fn remove_file_if_exists(path: &NormalizedPath) -> Result<bool> {
    let native_path = path.to_native();
    match fs::remove_file(&native_path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::io(&native_path, e)),
    }
}

/// Create a symlink at `link` pointing to `target`.
pub fn symlink(target: &NormalizedPath, link: &NormalizedPath) -> Result<()> {
    let link_path = link.to_native();
    if let Some(parent) = link_path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    #[cfg(unix)]
    let created = std::os::unix::fs::symlink(target.to_native(), &link_path);
    #[cfg(windows)]
    let created = std::os::windows::fs::symlink_file(target.to_native(), &link_path);

    created.map_err(|e| Error::io(&link_path, e))
}

/// Read the raw target of a symlink.
pub fn read_link(path: &NormalizedPath) -> Result<NormalizedPath> {
    let native_path = path.to_native();
    fs::read_link(&native_path)
        .map(NormalizedPath::new)
        .map_err(|e| Error::io(&native_path, e))
}

/// List the names of the immediate entries of a directory.
///
/// Names that are not valid UTF-8 are skipped; nothing the hosting tools
/// manage can carry such a name.
pub fn list_names(dir: &NormalizedPath) -> Result<Vec<String>> {
    let native_path = dir.to_native();
    let entries = fs::read_dir(&native_path).map_err(|e| Error::io(&native_path, e))?;

    let mut names = Vec::new();
    for entry in entries {
        match entry {
            Ok(entry) => match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => tracing::debug!(?raw, dir = %dir, "skipping non-UTF-8 entry"),
            },
            // Entry vanished between readdir calls
            Err(e) => tracing::debug!(error = %e, dir = %dir, "skipping unreadable entry"),
        }
    }
    Ok(names)
}
