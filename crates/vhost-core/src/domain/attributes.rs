//! One-file-per-key attribute storage

use vhost_fs::{NormalizedPath, io};

use crate::{Error, Result};

/// Attribute keys with a defined meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKey {
    /// `ip`: dedicated addresses, one per line
    Ip,
    /// `ftp-password`: stored FTP credential
    FtpPassword,
    /// `ftp-quota`: FTP quota text
    FtpQuota,
    /// `disabled`: marker that keeps the domain out of generated configs
    Disabled,
}

impl AttributeKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ip => "ip",
            Self::FtpPassword => "ftp-password",
            Self::FtpQuota => "ftp-quota",
            Self::Disabled => "disabled",
        }
    }
}

impl AsRef<str> for AttributeKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Maps attribute keys to files inside a domain's config directory.
///
/// Each read and write opens and closes its file within the call; no handle
/// outlives an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeStore {
    dir: NormalizedPath,
}

impl AttributeStore {
    pub fn new(dir: NormalizedPath) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &NormalizedPath {
        &self.dir
    }

    /// Path of the file backing `key`.
    ///
    /// Keys are single path components. Dot-files are refused since the
    /// atomic writer uses them for temp files.
    pub fn path(&self, key: &str) -> Result<NormalizedPath> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && !key.contains(['/', '\\', '\0']);
        if !valid {
            return Err(Error::InvalidAttributeKey {
                key: key.to_string(),
            });
        }
        Ok(self.dir.join(key))
    }

    /// Read an attribute. `None` means unset; an empty file is `Some("")`.
    ///
    /// One trailing newline is dropped.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let raw = self.get_raw(key)?;
        Ok(raw.map(|mut value| {
            if value.ends_with('\n') {
                value.pop();
                if value.ends_with('\r') {
                    value.pop();
                }
            }
            value
        }))
    }

    /// Read an attribute exactly as stored.
    pub fn get_raw(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key)?;
        Ok(io::read_optional_text(&path)?)
    }

    /// Write an attribute byte-for-byte, creating the directory if needed.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path(key)?;
        io::write_text(&path, value)?;
        tracing::debug!(key, dir = %self.dir, "attribute written");
        Ok(())
    }

    /// Unset an attribute. Returns whether a file was removed.
    pub fn remove(&self, key: &str) -> Result<bool> {
        let path = self.path(key)?;
        Ok(io::remove_file_if_exists(&path)?)
    }

    /// True if the attribute file exists, whatever its content.
    pub fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.path(key)?.is_file())
    }

    /// All keys currently set. A missing directory has no keys.
    pub fn keys(&self) -> Result<Vec<String>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut keys: Vec<String> = io::list_names(&self.dir)?
            .into_iter()
            .filter(|name| !name.starts_with('.'))
            .collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, AttributeStore) {
        let temp = TempDir::new().unwrap();
        let store = AttributeStore::new(NormalizedPath::new(temp.path()).join("config"));
        (temp, store)
    }

    #[test]
    fn unset_and_empty_are_distinct() {
        let (_temp, store) = store();
        assert_eq!(store.get("ip").unwrap(), None);

        store.set("ip", "").unwrap();
        assert_eq!(store.get("ip").unwrap(), Some(String::new()));
    }

    #[test]
    fn set_creates_config_dir() {
        let (_temp, store) = store();
        assert!(!store.dir().exists());

        store.set("ip", "10.0.0.1").unwrap();

        assert!(store.dir().is_dir());
        assert_eq!(store.get("ip").unwrap().as_deref(), Some("10.0.0.1"));
    }

    #[test]
    fn get_drops_one_trailing_newline_only() {
        let (_temp, store) = store();
        store.set("ftp-quota", "1M\n\n").unwrap();
        assert_eq!(store.get("ftp-quota").unwrap().as_deref(), Some("1M\n"));
        assert_eq!(store.get_raw("ftp-quota").unwrap().as_deref(), Some("1M\n\n"));
    }

    #[test]
    fn rejects_keys_that_escape_the_directory() {
        let (_temp, store) = store();
        for key in ["", "..", ".hidden", "a/b", "..\\x"] {
            assert!(
                matches!(store.get(key), Err(Error::InvalidAttributeKey { .. })),
                "{key:?} should be rejected"
            );
        }
    }

    #[test]
    fn remove_is_idempotent_and_keys_are_sorted() {
        let (_temp, store) = store();
        store.set("ip", "10.0.0.1").unwrap();
        store.set("disabled", "").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["disabled", "ip"]);

        assert!(store.remove("ip").unwrap());
        assert!(!store.remove("ip").unwrap());
        assert_eq!(store.keys().unwrap(), vec!["disabled"]);
    }
}
