//! Site identities and their config file names

use serde::Serialize;

use crate::hostname;

/// File name suffix shared by every generated site config.
pub const CONF_SUFFIX: &str = ".conf";

/// Explicit target that names both mass-hosting sites.
pub const MASS_HOSTING: &str = "zz-mass-hosting";

/// Explicit target for the TLS mass-hosting site alone.
pub const MASS_HOSTING_SSL: &str = "zz-mass-hosting.ssl";

/// One generated site config.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "kebab-case")]
pub enum SiteId {
    /// Shared plain-HTTP config serving every domain
    MassHosting,
    /// Shared TLS config serving every domain
    MassHostingSsl,
    /// Per-domain config, keyed by primary name
    Domain(String),
}

impl SiteId {
    /// Base name without the `.conf` suffix.
    pub fn stem(&self) -> &str {
        match self {
            Self::MassHosting => MASS_HOSTING,
            Self::MassHostingSsl => MASS_HOSTING_SSL,
            Self::Domain(name) => name,
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}{}", self.stem(), CONF_SUFFIX)
    }

    /// Parse a directory entry name. Anything that is not `<site>.conf`
    /// for a valid site is `None`.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let stem = file_name.strip_suffix(CONF_SUFFIX)?;
        match stem {
            MASS_HOSTING => Some(Self::MassHosting),
            MASS_HOSTING_SSL => Some(Self::MassHostingSsl),
            _ if hostname::is_valid_hostname(stem) => Some(Self::Domain(stem.to_string())),
            _ => None,
        }
    }

    /// Name of the template this site renders from.
    pub fn template(&self) -> &'static str {
        match self {
            Self::MassHosting => "zz-mass-hosting",
            Self::MassHostingSsl => "zz-mass-hosting.ssl",
            Self::Domain(_) => "non_ssl",
        }
    }

    pub fn is_mass_hosting(&self) -> bool {
        !matches!(self, Self::Domain(_))
    }
}

impl std::fmt::Display for SiteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.stem())
    }
}
