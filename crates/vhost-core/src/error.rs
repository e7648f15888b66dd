//! Error types for vhost-core

/// Result type for vhost-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in vhost-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Quota text could not be parsed
    #[error("Invalid quota format: {input:?}")]
    InvalidQuotaFormat { input: String },

    /// A real domain directory already uses this name
    #[error("Domain already exists: {name}")]
    DomainAlreadyExists { name: String },

    /// Name fails host label syntax
    #[error("Invalid hostname: {name:?}")]
    InvalidHostname { name: String },

    /// Attribute key would escape the config directory
    #[error("Invalid attribute key: {key:?}")]
    InvalidAttributeKey { key: String },

    /// Random name allocation gave up
    #[error("Could not allocate a free domain name under {root} after {attempts} attempts")]
    NameAllocationFailed { root: String, attempts: usize },

    /// Template rendering failed for one site
    #[error("Rendering failed for {site}: {reason}")]
    RenderFailed { site: String, reason: String },

    /// FTP credential could not be hashed
    #[error("Password hashing failed: {reason}")]
    PasswordHash { reason: String },

    /// Server reload command failed
    #[error("Reload failed: {reason}")]
    ReloadFailed { reason: String },

    /// Filesystem error from vhost-fs
    #[error(transparent)]
    Fs(#[from] vhost_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
