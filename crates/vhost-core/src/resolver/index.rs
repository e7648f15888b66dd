//! Snapshot of the names under a hosting root

use std::collections::HashMap;
use std::path::PathBuf;

use vhost_fs::{EntryKind, NormalizedPath, io};

use crate::domain::Domain;
use crate::hostname;

/// Primary-name and alias maps built from one scan of a hosting root.
///
/// Building the index once per call keeps repeated lookups during `www.`
/// and prefix stripping from rescanning the directory.
#[derive(Debug, Clone)]
pub struct DomainIndex {
    root: NormalizedPath,
    /// primary name -> real directory
    primaries: HashMap<String, NormalizedPath>,
    /// alias name -> primary name
    aliases: HashMap<String, String>,
}

impl DomainIndex {
    /// Scan `root`. An unreadable root yields an empty index; entries that
    /// vanish or cannot be inspected mid-scan are skipped.
    pub fn scan(root: &NormalizedPath) -> Self {
        let mut index = Self {
            root: root.clone(),
            primaries: HashMap::new(),
            aliases: HashMap::new(),
        };

        let names = match io::list_names(root) {
            Ok(names) => names,
            Err(e) => {
                tracing::warn!(root = %root, error = %e, "cannot read domain root");
                return index;
            }
        };

        let mut links = Vec::new();
        for name in names {
            if !hostname::is_valid_hostname(&name) {
                tracing::debug!(name, "skipping entry with invalid domain name");
                continue;
            }
            let path = root.join(&name);
            match path.entry_kind() {
                EntryKind::Dir => {
                    index.primaries.insert(name, path);
                }
                EntryKind::Symlink => links.push((name, path)),
                EntryKind::Missing => tracing::debug!(name, "entry vanished during scan"),
                _ => tracing::debug!(name, "skipping non-directory entry"),
            }
        }

        let Some(canonical_root) = root.canonicalize() else {
            return index;
        };
        let by_canonical: HashMap<PathBuf, String> = index
            .primaries
            .iter()
            .filter_map(|(name, path)| Some((path.canonicalize()?, name.clone())))
            .collect();

        for (name, path) in links {
            let Some(target) = path.canonicalize() else {
                tracing::debug!(name, "skipping dangling alias");
                continue;
            };
            if target.parent() != Some(canonical_root.as_path()) {
                tracing::debug!(name, target = %target.display(), "skipping alias outside root");
                continue;
            }
            match by_canonical.get(&target) {
                Some(primary) => {
                    index.aliases.insert(name, primary.clone());
                }
                None => tracing::debug!(name, "skipping alias to a non-domain entry"),
            }
        }

        index
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    /// Exact lookup of a primary or alias name.
    pub fn get(&self, name: &str) -> Option<Domain> {
        if self.primaries.contains_key(name) {
            return Some(Domain::new(name, self.root.clone()));
        }
        self.aliases
            .get(name)
            .map(|primary| Domain::aliased(name.to_string(), primary.clone(), self.root.clone()))
    }

    pub fn is_primary(&self, name: &str) -> bool {
        self.primaries.contains_key(name)
    }

    /// Primary name behind an alias.
    pub fn primary_of(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    /// Alias names that point at `primary`, sorted.
    pub fn aliases_of(&self, primary: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .aliases
            .iter()
            .filter(|(_, p)| p.as_str() == primary)
            .map(|(alias, _)| alias.clone())
            .collect();
        names.sort();
        names
    }

    /// Every reachable name: primaries first, then aliases.
    pub fn domains(&self) -> Vec<Domain> {
        self.primaries()
            .into_iter()
            .chain(self.aliases.iter().map(|(alias, primary)| {
                Domain::aliased(alias.clone(), primary.clone(), self.root.clone())
            }))
            .collect()
    }

    /// Primary domains only.
    pub fn primaries(&self) -> Vec<Domain> {
        self.primaries
            .keys()
            .map(|name| Domain::new(name.clone(), self.root.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.primaries.len() + self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
