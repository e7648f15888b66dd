//! Domain store
//!
//! A domain is a directory `root/<name>` holding a `config/` directory of
//! attribute files and, once published, a `public/htdocs/` document root.
//! Aliases are symlinks in `root` that resolve to the same real directory.

mod attributes;
mod settings;

pub use attributes::{AttributeKey, AttributeStore};
pub use settings::{DomainSettings, parse_ips};

use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::net::IpAddr;

use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use uuid::Uuid;
use vhost_fs::{EntryKind, Error as FsError, HostPath, NormalizedPath, io};

use crate::hostname::{self, RANDOM_LABEL_LEN};
use crate::quota::{self, Quota};
use crate::{Error, Result};

/// Attempts at finding a free random name before giving up.
const MAX_NAME_ATTEMPTS: usize = 64;

/// Handle to one domain entry under a hosting root.
///
/// Handles are cheap and perform no I/O on construction; every accessor
/// reads the live filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Domain {
    /// Name this domain was reached by
    name: String,
    /// Name of the real directory behind `name`
    primary: String,
    root: NormalizedPath,
}

impl Domain {
    /// Handle for `root/name`, assuming `name` is the primary name.
    pub fn new(name: impl Into<String>, root: NormalizedPath) -> Self {
        let name = name.into();
        Self {
            primary: name.clone(),
            name,
            root,
        }
    }

    /// Handle for an alias entry that resolves to `primary`.
    pub(crate) fn aliased(name: String, primary: String, root: NormalizedPath) -> Self {
        Self {
            name,
            primary,
            root,
        }
    }

    /// Create a new domain under `root`.
    ///
    /// Without a name a random label is allocated. The document root is not
    /// created; see [`Domain::create_htdocs`].
    ///
    /// # Errors
    ///
    /// - `InvalidHostname` if `name` fails host name syntax or is reserved
    /// - `DomainAlreadyExists` if a real directory already has that name
    pub fn create(root: &NormalizedPath, name: Option<&str>) -> Result<Self> {
        fs::create_dir_all(root.to_native()).map_err(|e| FsError::io(root.to_native(), e))?;

        let domain = match name {
            Some(name) => Self::create_named(root, name)?,
            None => Self::create_random(root)?,
        };

        let config_dir = domain.config_dir();
        fs::create_dir_all(config_dir.to_native())
            .map_err(|e| FsError::io(config_dir.to_native(), e))?;

        tracing::info!(domain = %domain.name, root = %root, "created domain");
        Ok(domain)
    }

    fn create_named(root: &NormalizedPath, name: &str) -> Result<Self> {
        let name = hostname::normalize_hostname(name)
            .filter(|n| !hostname::is_reserved(n))
            .ok_or_else(|| Error::InvalidHostname {
                name: name.to_string(),
            })?;

        let directory = root.join(&name);
        match directory.entry_kind() {
            EntryKind::Missing => {}
            EntryKind::Symlink => {
                tracing::warn!(domain = %name, "replacing alias symlink with a real domain");
                io::remove_file_if_exists(&directory)?;
            }
            _ => return Err(Error::DomainAlreadyExists { name }),
        }

        match fs::create_dir(directory.to_native()) {
            Ok(()) => Ok(Self::new(name, root.clone())),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                Err(Error::DomainAlreadyExists { name })
            }
            Err(e) => Err(FsError::io(directory.to_native(), e).into()),
        }
    }

    fn create_random(root: &NormalizedPath) -> Result<Self> {
        for _ in 0..MAX_NAME_ATTEMPTS {
            let name = hostname::random_label(RANDOM_LABEL_LEN);
            let directory = root.join(&name);
            if directory.is_occupied() {
                continue;
            }
            match fs::create_dir(directory.to_native()) {
                Ok(()) => return Ok(Self::new(name, root.clone())),
                // Lost a race for this name; draw another
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(FsError::io(directory.to_native(), e).into()),
            }
        }
        Err(Error::NameAllocationFailed {
            root: root.to_string(),
            attempts: MAX_NAME_ATTEMPTS,
        })
    }

    /// Remove this domain's entry. An alias handle only unlinks the alias.
    ///
    /// Removing an absent domain succeeds. Aliases of a removed primary are
    /// left dangling.
    pub fn destroy(&self) -> Result<()> {
        let directory = self.directory();
        let native = directory.to_native();
        let removed = match directory.entry_kind() {
            EntryKind::Missing => return Ok(()),
            EntryKind::Dir => fs::remove_dir_all(&native),
            _ => fs::remove_file(&native),
        };
        match removed {
            Ok(()) => {
                tracing::info!(domain = %self.name, "destroyed domain");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FsError::io(native, e).into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the real directory this domain resolves to.
    pub fn primary_name(&self) -> &str {
        &self.primary
    }

    /// True if this handle was reached through an alias symlink.
    pub fn is_alias(&self) -> bool {
        self.name != self.primary
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    /// `root/<name>`
    pub fn directory(&self) -> NormalizedPath {
        self.root.join(&self.name)
    }

    /// `root/<name>/config`
    pub fn config_dir(&self) -> NormalizedPath {
        self.directory().join(HostPath::ConfigDir.as_str())
    }

    /// `root/<name>/public`
    pub fn public_dir(&self) -> NormalizedPath {
        self.directory().join(HostPath::PublicDir.as_str())
    }

    /// `root/<name>/public/htdocs`
    pub fn htdocs_dir(&self) -> NormalizedPath {
        self.directory().join(HostPath::HtdocsDir.as_str())
    }

    /// True if the entry resolves to a directory.
    pub fn exists(&self) -> bool {
        self.directory().is_dir()
    }

    pub fn has_htdocs(&self) -> bool {
        self.htdocs_dir().is_dir()
    }

    /// Create the document root.
    pub fn create_htdocs(&self) -> Result<()> {
        let htdocs = self.htdocs_dir();
        fs::create_dir_all(htdocs.to_native()).map_err(|e| FsError::io(htdocs.to_native(), e))?;
        Ok(())
    }

    /// Every other name under the root that resolves to this domain's
    /// directory, including the primary name when this handle is an alias.
    pub fn aliases(&self) -> Result<BTreeSet<String>> {
        let Some(canonical) = self.directory().canonicalize() else {
            return Ok(BTreeSet::new());
        };

        let mut aliases = BTreeSet::new();
        for name in io::list_names(&self.root)? {
            if name == self.name || !hostname::is_valid_hostname(&name) {
                continue;
            }
            if self.root.join(&name).canonicalize().as_ref() == Some(&canonical) {
                aliases.insert(name);
            }
        }
        Ok(aliases)
    }

    pub fn attributes(&self) -> AttributeStore {
        AttributeStore::new(self.config_dir())
    }

    /// Read an attribute; `None` when unset.
    pub fn get_attribute(&self, key: &str) -> Result<Option<String>> {
        self.attributes().get(key)
    }

    /// Write an attribute, creating the config directory if needed.
    pub fn set_attribute(&self, key: &str, value: &str) -> Result<()> {
        self.attributes().set(key, value)
    }

    pub fn remove_attribute(&self, key: &str) -> Result<bool> {
        self.attributes().remove(key)
    }

    pub fn settings(&self) -> Result<DomainSettings> {
        DomainSettings::load(&self.attributes())
    }

    /// FTP quota; `Quota::Unlimited` when no quota is set.
    pub fn ftp_quota(&self) -> Result<Quota> {
        match self.get_attribute(AttributeKey::FtpQuota.as_str())? {
            Some(text) => text.parse(),
            None => Ok(Quota::Unlimited),
        }
    }

    /// Store quota text verbatim after checking that it parses.
    pub fn set_ftp_quota(&self, text: &str) -> Result<()> {
        quota::parse(text)?;
        self.set_attribute(AttributeKey::FtpQuota.as_str(), text)
    }

    pub fn set_ftp_quota_bytes(&self, bytes: u64) -> Result<()> {
        self.set_attribute(AttributeKey::FtpQuota.as_str(), &quota::format(bytes))
    }

    /// Stored FTP credential, if one is set.
    pub fn ftp_password(&self) -> Result<Option<String>> {
        Ok(self
            .get_attribute(AttributeKey::FtpPassword.as_str())?
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty()))
    }

    /// Store an FTP credential as a salted Argon2 PHC string.
    pub fn set_ftp_password(&self, password: &str) -> Result<()> {
        let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes()).map_err(|e| {
            Error::PasswordHash {
                reason: e.to_string(),
            }
        })?;
        let hashed = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| Error::PasswordHash {
                reason: e.to_string(),
            })?
            .to_string();
        self.set_attribute(AttributeKey::FtpPassword.as_str(), &hashed)
    }

    /// Check a login attempt against the stored credential.
    ///
    /// Accepts PHC hashes written by [`Domain::set_ftp_password`] and
    /// plaintext credentials written by hand. No credential means no login.
    pub fn verify_ftp_password(&self, candidate: &str) -> Result<bool> {
        let Some(stored) = self.ftp_password()? else {
            return Ok(false);
        };
        if !stored.starts_with('$') {
            return Ok(stored == candidate);
        }
        match PasswordHash::new(&stored) {
            Ok(parsed) => Ok(Argon2::default()
                .verify_password(candidate.as_bytes(), &parsed)
                .is_ok()),
            Err(e) => {
                tracing::warn!(domain = %self.name, error = %e, "unreadable ftp-password hash");
                Ok(false)
            }
        }
    }

    /// Dedicated addresses from the `ip` attribute.
    pub fn ips(&self) -> Result<Vec<IpAddr>> {
        Ok(self
            .get_attribute(AttributeKey::Ip.as_str())?
            .map(|text| parse_ips(&text))
            .unwrap_or_default())
    }

    /// True if the `disabled` marker is present.
    pub fn is_disabled(&self) -> Result<bool> {
        self.attributes().contains(AttributeKey::Disabled.as_str())
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
