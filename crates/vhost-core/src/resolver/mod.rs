//! Hostname resolution against a hosting root
//!
//! [`DomainResolver::find`] maps the hostname a client asked for onto the
//! domain that should serve it:
//!
//! 1. the name itself, as a real domain directory or an alias symlink
//! 2. the name with redundant leading `www.` labels removed one at a time
//! 3. the same two steps on each shorter suffix of the name, so that
//!    `anything.www2.example.com` is served like `www2.example.com`
//!
//! Input that is not a syntactically valid host name never reaches the
//! filesystem. "Not found" is an ordinary `None`, never an error.

mod index;

pub use index::DomainIndex;

use vhost_fs::NormalizedPath;

use crate::domain::Domain;
use crate::hostname;

/// Resolves hostnames to domains under one explicit root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainResolver {
    root: NormalizedPath,
}

impl DomainResolver {
    pub fn new(root: NormalizedPath) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    /// Fresh snapshot of the root.
    pub fn index(&self) -> DomainIndex {
        DomainIndex::scan(&self.root)
    }

    /// Every domain reachable under the root: one entry per real directory
    /// and one per live alias. Order is unspecified.
    pub fn enumerate(&self) -> Vec<Domain> {
        self.index().domains()
    }

    /// Primary domains only.
    pub fn primaries(&self) -> Vec<Domain> {
        self.index().primaries()
    }

    /// Exact match on a primary or alias name, without any stripping.
    pub fn lookup(&self, name: &str) -> Option<Domain> {
        let name = hostname::normalize_hostname(name)?;
        self.index().get(&name)
    }

    /// Find the domain that serves `hostname`.
    pub fn find(&self, hostname: &str) -> Option<Domain> {
        let Some(host) = hostname::normalize_hostname(hostname) else {
            tracing::debug!(hostname, "rejecting malformed hostname");
            return None;
        };

        let index = self.index();
        let found = find_in(&index, &host);
        match &found {
            Some(domain) => tracing::debug!(hostname = %host, domain = %domain, "resolved"),
            None => tracing::debug!(hostname = %host, "no matching domain"),
        }
        found
    }
}

/// Walk the label suffixes of an already-validated `host`.
///
/// Validation caps the label count, which bounds both loops.
pub fn find_in(index: &DomainIndex, host: &str) -> Option<Domain> {
    let mut suffix = host;
    loop {
        let mut candidate = suffix;
        loop {
            if let Some(domain) = index.get(candidate) {
                return Some(domain);
            }
            match candidate.strip_prefix("www.") {
                Some(rest) if !rest.is_empty() => candidate = rest,
                _ => break,
            }
        }
        let (_, rest) = suffix.split_once('.')?;
        suffix = rest;
    }
}
