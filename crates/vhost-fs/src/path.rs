//! Normalized path handling

use std::fs;
use std::path::{Path, PathBuf};

/// What sits at a path, inspected without following a final symlink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Nothing there
    Missing,
    /// A real directory
    Dir,
    /// A regular file
    File,
    /// A symlink, live or dangling
    Symlink,
    /// Sockets, fifos and other special files
    Other,
}

/// A path normalized to use forward slashes internally.
///
/// All hosting paths (domain directories, site-config files) pass through
/// this type so that joins and comparisons behave the same everywhere.
/// Conversion to a native `PathBuf` happens only at I/O boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        let mut normalized = path_str.replace('\\', "/");
        while normalized.len() > 1 && normalized.ends_with('/') {
            normalized.pop();
        }
        Self { inner: normalized }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment.
    ///
    /// Empty segments and `.` components are dropped; the segment is always
    /// treated as relative to `self`.
    pub fn join(&self, segment: &str) -> Self {
        let segment_normalized = segment.replace('\\', "/");
        let mut joined = self.inner.clone();
        for part in segment_normalized
            .split('/')
            .filter(|p| !p.is_empty() && *p != ".")
        {
            if !joined.ends_with('/') {
                joined.push('/');
            }
            joined.push_str(part);
        }
        Self { inner: joined }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 { None } else { Some(&name[idx + 1..]) }
        })
    }

    /// Check if this path exists, following symlinks.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a directory, following symlinks.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Check if this is a file, following symlinks.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }

    /// Inspect the entry at this path without following a final symlink.
    ///
    /// Any lstat failure (including permission errors and entries that
    /// vanish mid-call) reads as `Missing`.
    pub fn entry_kind(&self) -> EntryKind {
        match fs::symlink_metadata(self.to_native()) {
            Ok(meta) => {
                let file_type = meta.file_type();
                if file_type.is_symlink() {
                    EntryKind::Symlink
                } else if file_type.is_dir() {
                    EntryKind::Dir
                } else if file_type.is_file() {
                    EntryKind::File
                } else {
                    EntryKind::Other
                }
            }
            Err(_) => EntryKind::Missing,
        }
    }

    /// True when something (even a dangling symlink) occupies this path.
    pub fn is_occupied(&self) -> bool {
        self.entry_kind() != EntryKind::Missing
    }

    /// Fully resolve symlinks, returning `None` when the path does not
    /// resolve (dangling link, missing entry, permission error).
    pub fn canonicalize(&self) -> Option<PathBuf> {
        dunce::canonicalize(self.to_native()).ok()
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
