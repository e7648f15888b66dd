//! What is on disk in `sites-available` and `sites-enabled`

use std::collections::BTreeMap;

use vhost_fs::{EntryKind, NormalizedPath, io};

use super::managed::{self, Ownership};
use super::site::SiteId;
use crate::Result;
use crate::config::HostConfig;

/// State of `sites-available/<site>.conf`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Available {
    #[default]
    Missing,
    /// Generated file; carries the rendered body
    Managed { body: String },
    /// Hand-written, hand-edited or not a regular file
    Unmanaged,
}

/// State of `sites-enabled/<site>.conf`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Enabled {
    #[default]
    Missing,
    /// Symlink to our own `sites-available` file, possibly dangling
    Linked,
    /// Generated regular file
    Managed { body: String },
    Unmanaged,
}

impl Enabled {
    pub fn is_managed(&self) -> bool {
        matches!(self, Self::Linked | Self::Managed { .. })
    }
}

/// Both files of one site.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SiteFiles {
    pub available: Available,
    pub enabled: Enabled,
}

impl SiteFiles {
    pub fn is_managed(&self) -> bool {
        matches!(self.available, Available::Managed { .. }) || self.enabled.is_managed()
    }
}

/// One scan of both site directories.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    sites: BTreeMap<SiteId, SiteFiles>,
    /// `sites-available/x` style names of everything left alone
    unmanaged: Vec<String>,
}

impl Inventory {
    /// Scan both directories. Missing directories count as empty.
    pub fn scan(config: &HostConfig) -> Result<Self> {
        let available_dir = config.sites_available();
        let enabled_dir = config.sites_enabled();
        let mut inventory = Self::default();

        for name in list_optional(&available_dir)? {
            let Some(site) = SiteId::from_file_name(&name) else {
                inventory.note_unmanaged("sites-available", &name);
                continue;
            };
            if let Some(available) = classify_available(&available_dir.join(&name))? {
                inventory.sites.entry(site).or_default().available = available;
            }
        }

        for name in list_optional(&enabled_dir)? {
            let Some(site) = SiteId::from_file_name(&name) else {
                inventory.note_unmanaged("sites-enabled", &name);
                continue;
            };
            let files = inventory.sites.entry(site).or_default();
            let owned_target = files.available != Available::Unmanaged;
            let link = enabled_dir.join(&name);
            if let Some(enabled) = classify_enabled(&link, &available_dir.join(&name), owned_target)? {
                files.enabled = enabled;
            }
        }

        for (site, files) in &inventory.sites {
            let file = site.file_name();
            if files.available == Available::Unmanaged {
                inventory.unmanaged.push(format!("sites-available/{file}"));
            }
            if files.enabled == Enabled::Unmanaged {
                inventory.unmanaged.push(format!("sites-enabled/{file}"));
            }
        }
        inventory.unmanaged.sort();
        inventory.unmanaged.dedup();

        Ok(inventory)
    }

    fn note_unmanaged(&mut self, dir: &str, name: &str) {
        tracing::debug!(dir, name, "leaving non-site entry alone");
        self.unmanaged.push(format!("{dir}/{name}"));
    }

    /// Files for `site`; both missing when nothing is on disk.
    pub fn get(&self, site: &SiteId) -> SiteFiles {
        self.sites.get(site).cloned().unwrap_or_default()
    }

    /// Sites with at least one managed file.
    pub fn managed_sites(&self) -> impl Iterator<Item = &SiteId> {
        self.sites
            .iter()
            .filter(|(_, files)| files.is_managed())
            .map(|(site, _)| site)
    }

    pub fn unmanaged(&self) -> &[String] {
        &self.unmanaged
    }
}

fn list_optional(dir: &NormalizedPath) -> Result<Vec<String>> {
    match io::list_names(dir) {
        Ok(mut names) => {
            names.sort();
            Ok(names)
        }
        Err(e) if e.is_not_found() => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

/// `None` when the entry vanished mid-scan.
fn classify_available(path: &NormalizedPath) -> Result<Option<Available>> {
    match path.entry_kind() {
        EntryKind::Missing => Ok(None),
        EntryKind::File => {
            let Some(content) = io::read_optional_text(path)? else {
                return Ok(None);
            };
            Ok(Some(match managed::classify(&content) {
                Ownership::Managed { body } => Available::Managed { body },
                Ownership::Edited => {
                    tracing::warn!(path = %path, "generated site config was edited by hand");
                    Available::Unmanaged
                }
                Ownership::Foreign => Available::Unmanaged,
            }))
        }
        _ => Ok(Some(Available::Unmanaged)),
    }
}

/// `owned_target` is false when the matching available file is not ours, in
/// which case a link to it belongs to whoever wrote that file.
fn classify_enabled(
    path: &NormalizedPath,
    available: &NormalizedPath,
    owned_target: bool,
) -> Result<Option<Enabled>> {
    match path.entry_kind() {
        EntryKind::Missing => Ok(None),
        EntryKind::Symlink => {
            let target = match io::read_link(path) {
                Ok(target) => target,
                Err(e) if e.is_not_found() => return Ok(None),
                Err(e) => return Err(e.into()),
            };
            let points_home = target == *available
                || matches!(
                    (path.canonicalize(), available.canonicalize()),
                    (Some(a), Some(b)) if a == b
                );
            Ok(Some(if points_home && owned_target {
                Enabled::Linked
            } else {
                Enabled::Unmanaged
            }))
        }
        EntryKind::File => {
            let Some(content) = io::read_optional_text(path)? else {
                return Ok(None);
            };
            Ok(Some(match managed::classify(&content) {
                Ownership::Managed { body } => Enabled::Managed { body },
                _ => Enabled::Unmanaged,
            }))
        }
        _ => Ok(Some(Enabled::Unmanaged)),
    }
}
