//! Outcome of a reconciliation run

use serde::Serialize;

/// Kind of filesystem change made (or planned) for one site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    /// Rendered config written to `sites-available`
    WroteAvailable,
    /// Existing rendered config replaced with a new body
    UpdatedAvailable,
    /// Rendered config rewritten in place in `sites-enabled`
    UpdatedEnabled,
    /// Symlink created in `sites-enabled`
    Enabled,
    /// Managed entry removed from `sites-enabled`
    RemovedEnabled,
    /// Managed config removed from `sites-available`
    RemovedAvailable,
}

impl ActionKind {
    fn describe(self) -> &'static str {
        match self {
            Self::WroteAvailable => "write",
            Self::UpdatedAvailable => "update",
            Self::UpdatedEnabled => "update",
            Self::Enabled => "enable",
            Self::RemovedEnabled => "disable",
            Self::RemovedAvailable => "remove",
        }
    }
}

/// One filesystem change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    pub kind: ActionKind,
    /// Site stem, e.g. `example.com` or `zz-mass-hosting`
    pub site: String,
    pub path: String,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} ({})", self.kind.describe(), self.site, self.path)
    }
}

/// A site the run left alone, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteNote {
    pub site: String,
    pub reason: String,
}

impl SiteNote {
    pub fn new(site: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for SiteNote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.site, self.reason)
    }
}

/// Everything one run did, planned, or refused to do.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Actions were planned but not applied
    pub dry_run: bool,
    pub actions: Vec<Action>,
    /// Sites deliberately left as they are
    pub skipped: Vec<SiteNote>,
    /// Sites whose files are owned by someone else
    pub conflicts: Vec<SiteNote>,
    pub errors: Vec<SiteNote>,
    /// Entries in the site directories the run never touches
    pub unmanaged: Vec<String>,
    /// The run stopped at the first error
    pub aborted: bool,
    /// The web server was reloaded after the changes
    pub reloaded: bool,
}

impl ReconcileReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    /// True when no site failed.
    pub fn success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Filesystem changes actually made. Always zero for a dry run.
    pub fn mutations(&self) -> usize {
        if self.dry_run { 0 } else { self.actions.len() }
    }

    /// True when there was nothing to change.
    pub fn is_clean(&self) -> bool {
        self.actions.is_empty()
    }
}
