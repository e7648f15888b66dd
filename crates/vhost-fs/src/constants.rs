//! Fixed names in the hosting filesystem layout.

use std::path::Path;

/// Well-known path segments shared by the domain store and the reconciler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPath {
    /// `config`, per-domain attribute directory
    ConfigDir,
    /// `public`, per-domain public tree
    PublicDir,
    /// `public/htdocs`, per-domain document root
    HtdocsDir,
    /// `srv`, default domain prefix under the root dir
    Prefix,
    /// `etc/apache2`, web-server configuration directory
    ApacheDir,
    /// `sites-available`, rendered site configs
    SitesAvailable,
    /// `sites-enabled`, links to the active site configs
    SitesEnabled,
    /// `etc/symbiosis/apache.d`, templates and toggles
    TemplateDir,
    /// `etc/symbiosis/vhost.toml`, optional settings overrides
    SettingsFile,
}

impl HostPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConfigDir => "config",
            Self::PublicDir => "public",
            Self::HtdocsDir => "public/htdocs",
            Self::Prefix => "srv",
            Self::ApacheDir => "etc/apache2",
            Self::SitesAvailable => "sites-available",
            Self::SitesEnabled => "sites-enabled",
            Self::TemplateDir => "etc/symbiosis/apache.d",
            Self::SettingsFile => "etc/symbiosis/vhost.toml",
        }
    }
}

impl AsRef<Path> for HostPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for HostPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for HostPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
