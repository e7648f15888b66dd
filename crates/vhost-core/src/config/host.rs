//! Resolved hosting configuration

use serde::{Deserialize, Serialize};
use vhost_fs::{ConfigStore, HostPath, NormalizedPath};

use super::overrides::HostOverrides;
use crate::Result;

/// File whose presence in the template directory disables mass hosting.
pub const MASS_HOSTING_TOGGLE: &str = "disabled.zz-mass-hosting";

/// How an explicitly named domain interacts with mass hosting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExplicitPolicy {
    /// A named domain always gets its own site config.
    ///
    /// The site only lives until the next sweep: a domain without a
    /// dedicated IP is served by mass hosting there, so the sweep removes
    /// the file an explicit run wrote. Give the domain an `ip` attribute, or
    /// turn mass hosting off, to keep it.
    #[default]
    Additive,
    /// Mass hosting covers named domains too, unless they have a dedicated IP
    Exclusive,
}

/// What the reconciler does after one site fails to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Record the failure and carry on with the remaining sites
    #[default]
    Continue,
    /// Stop the run at the first failure
    Abort,
}

/// Paths and policies for one hosting root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    pub root_dir: NormalizedPath,
    /// Directory holding the domain entries
    pub prefix: NormalizedPath,
    /// Web-server configuration directory
    pub apache_dir: NormalizedPath,
    /// Site templates and the mass-hosting toggle
    pub template_dir: NormalizedPath,
    pub explicit_policy: ExplicitPolicy,
    pub error_policy: ErrorPolicy,
    /// Program and arguments run to reload the web server
    pub reload_command: Vec<String>,
}

impl HostConfig {
    /// Default layout under `root_dir`, without reading any settings file.
    pub fn for_root(root_dir: impl Into<NormalizedPath>) -> Self {
        let root_dir = root_dir.into();
        Self {
            prefix: root_dir.join(HostPath::Prefix.as_str()),
            apache_dir: root_dir.join(HostPath::ApacheDir.as_str()),
            template_dir: root_dir.join(HostPath::TemplateDir.as_str()),
            explicit_policy: ExplicitPolicy::default(),
            error_policy: ErrorPolicy::default(),
            reload_command: vec!["/usr/sbin/apache2ctl".to_string(), "graceful".to_string()],
            root_dir,
        }
    }

    /// Default layout with the settings file under `root_dir` applied.
    pub fn load(root_dir: impl Into<NormalizedPath>) -> Result<Self> {
        let config = Self::for_root(root_dir);
        let path = config.root_dir.join(HostPath::SettingsFile.as_str());
        match ConfigStore::new().load_optional::<HostOverrides>(&path)? {
            Some(overrides) => {
                tracing::debug!(path = %path, "applying settings overrides");
                Ok(config.with_overrides(overrides))
            }
            None => Ok(config),
        }
    }

    pub fn with_overrides(mut self, overrides: HostOverrides) -> Self {
        if let Some(prefix) = overrides.prefix {
            self.prefix = self.resolve(&prefix);
        }
        if let Some(apache_dir) = overrides.apache_dir {
            self.apache_dir = self.resolve(&apache_dir);
        }
        if let Some(template_dir) = overrides.template_dir {
            self.template_dir = self.resolve(&template_dir);
        }
        if let Some(policy) = overrides.explicit_policy {
            self.explicit_policy = policy;
        }
        if let Some(policy) = overrides.error_policy {
            self.error_policy = policy;
        }
        if let Some(command) = overrides.reload_command {
            self.reload_command = command;
        }
        self
    }

    pub fn with_explicit_policy(mut self, policy: ExplicitPolicy) -> Self {
        self.explicit_policy = policy;
        self
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Absolute paths pass through; anything else hangs off `root_dir`.
    fn resolve(&self, path: &str) -> NormalizedPath {
        if path.starts_with('/') {
            NormalizedPath::new(path)
        } else {
            self.root_dir.join(path)
        }
    }

    pub fn sites_available(&self) -> NormalizedPath {
        self.apache_dir.join(HostPath::SitesAvailable.as_str())
    }

    pub fn sites_enabled(&self) -> NormalizedPath {
        self.apache_dir.join(HostPath::SitesEnabled.as_str())
    }

    pub fn mass_hosting_toggle(&self) -> NormalizedPath {
        self.template_dir.join(MASS_HOSTING_TOGGLE)
    }

    /// Mass hosting is on unless the toggle file exists.
    pub fn mass_hosting_enabled(&self) -> bool {
        !self.mass_hosting_toggle().is_occupied()
    }
}
