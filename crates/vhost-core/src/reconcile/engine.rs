//! Apply a plan to the site directories

use std::collections::BTreeSet;

use vhost_fs::{NormalizedPath, io};

use super::inventory::{Available, Enabled, Inventory, SiteFiles};
use super::managed;
use super::plan::{DesiredSite, Plan, Scope};
use super::reload::{CommandReloader, Reloader};
use super::render::{SiteRenderer, TemplateRenderer};
use super::report::{Action, ActionKind, ReconcileReport, SiteNote};
use super::site::SiteId;
use crate::Result;
use crate::config::{ErrorPolicy, HostConfig};
use crate::resolver::DomainResolver;

/// Per-run switches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Explicit sites; empty means a full sweep
    pub targets: Vec<String>,
    pub dry_run: bool,
    pub no_reload: bool,
}

impl ReconcileOptions {
    pub fn sweep() -> Self {
        Self::default()
    }

    pub fn targets<I, S>(targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            targets: targets.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn no_reload(mut self, no_reload: bool) -> Self {
        self.no_reload = no_reload;
        self
    }
}

/// Brings generated site configs in line with the domains on disk.
pub struct Reconciler {
    config: HostConfig,
    renderer: Box<dyn SiteRenderer>,
    reloader: Box<dyn Reloader>,
}

impl Reconciler {
    /// Template files from the config's template directory and the
    /// configured reload command.
    pub fn new(config: HostConfig) -> Self {
        Self {
            renderer: Box::new(TemplateRenderer::new(config.template_dir.clone())),
            reloader: Box::new(CommandReloader::new(config.reload_command.clone())),
            config,
        }
    }

    pub fn with_renderer(mut self, renderer: impl SiteRenderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn with_reloader(mut self, reloader: impl Reloader + 'static) -> Self {
        self.reloader = Box::new(reloader);
        self
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Run one reconciliation.
    ///
    /// Per-site failures land in the report; only a failure to read the site
    /// directories at all is returned as an error.
    pub fn run(&self, options: &ReconcileOptions) -> Result<ReconcileReport> {
        let index = DomainResolver::new(self.config.prefix.clone()).index();
        let plan = if options.targets.is_empty() {
            Plan::sweep(&self.config, &index)
        } else {
            Plan::targets(&self.config, &index, &options.targets)
        };
        let inventory = Inventory::scan(&self.config)?;

        let mut report = ReconcileReport::new(options.dry_run);
        report.skipped = plan.skipped.clone();
        report.errors = plan.errors.clone();
        report.unmanaged = inventory.unmanaged().to_vec();

        let scope: BTreeSet<SiteId> = match &plan.scope {
            Scope::Sweep => plan
                .desired
                .keys()
                .chain(inventory.managed_sites())
                .cloned()
                .collect(),
            Scope::Targets(targets) => targets.clone(),
        };

        if self.config.error_policy == ErrorPolicy::Abort && !report.errors.is_empty() {
            report.aborted = true;
            return Ok(report);
        }

        for site in &scope {
            let files = inventory.get(site);
            let applied = match plan.desired.get(site) {
                Some(desired) => self.apply_desired(site, desired, &files, &mut report),
                None => self.apply_undesired(site, &files, &mut report),
            };
            if let Err(e) = applied {
                tracing::warn!(site = %site, error = %e, "site failed");
                report.errors.push(SiteNote::new(site.stem(), e.to_string()));
                if self.config.error_policy == ErrorPolicy::Abort {
                    report.aborted = true;
                    break;
                }
            }
        }

        if report.mutations() > 0 && !options.no_reload {
            match self.reloader.reload() {
                Ok(()) => report.reloaded = true,
                Err(e) => {
                    tracing::warn!(error = %e, "reload failed");
                    report.errors.push(SiteNote::new("reload", e.to_string()));
                }
            }
        }

        tracing::info!(
            actions = report.actions.len(),
            errors = report.errors.len(),
            dry_run = report.dry_run,
            "reconciliation finished"
        );
        Ok(report)
    }

    fn available_path(&self, site: &SiteId) -> NormalizedPath {
        self.config.sites_available().join(&site.file_name())
    }

    fn enabled_path(&self, site: &SiteId) -> NormalizedPath {
        self.config.sites_enabled().join(&site.file_name())
    }

    fn apply_desired(
        &self,
        site: &SiteId,
        desired: &DesiredSite,
        files: &SiteFiles,
        report: &mut ReconcileReport,
    ) -> Result<()> {
        let available = self.available_path(site);
        let enabled = self.enabled_path(site);

        if files.available == Available::Unmanaged {
            conflict(report, site, &available);
            return Ok(());
        }
        if files.enabled == Enabled::Unmanaged {
            conflict(report, site, &enabled);
            return Ok(());
        }

        let disabled_by_hand =
            matches!(files.available, Available::Managed { .. }) && files.enabled == Enabled::Missing;
        if disabled_by_hand && !desired.explicit {
            tracing::debug!(site = %site, "leaving site disabled");
            report.skipped.push(SiteNote::new(
                site.stem(),
                "disabled by hand; name it explicitly to enable it again",
            ));
            return Ok(());
        }

        let body = self.renderer.render(&desired.context)?;

        let write_kind = match &files.available {
            Available::Missing => Some(ActionKind::WroteAvailable),
            Available::Managed { body: current } if *current != body => {
                Some(ActionKind::UpdatedAvailable)
            }
            _ => None,
        };
        if let Some(kind) = write_kind {
            self.mutate(report, kind, site, &available, || {
                io::write_text(&available, &managed::wrap(&body))
            })?;
        }

        match &files.enabled {
            Enabled::Missing => {
                self.mutate(report, ActionKind::Enabled, site, &enabled, || {
                    io::symlink(&available, &enabled)
                })?;
            }
            Enabled::Managed { body: current } if *current != body => {
                self.mutate(report, ActionKind::UpdatedEnabled, site, &enabled, || {
                    io::write_text(&enabled, &managed::wrap(&body))
                })?;
            }
            _ => {}
        }
        Ok(())
    }

    fn apply_undesired(
        &self,
        site: &SiteId,
        files: &SiteFiles,
        report: &mut ReconcileReport,
    ) -> Result<()> {
        if files.enabled.is_managed() {
            let enabled = self.enabled_path(site);
            self.mutate(report, ActionKind::RemovedEnabled, site, &enabled, || {
                io::remove_file_if_exists(&enabled).map(|_| ())
            })?;
        }
        if matches!(files.available, Available::Managed { .. }) {
            let available = self.available_path(site);
            self.mutate(report, ActionKind::RemovedAvailable, site, &available, || {
                io::remove_file_if_exists(&available).map(|_| ())
            })?;
        }
        Ok(())
    }

    /// Record `kind` and, outside a dry run, perform it.
    fn mutate(
        &self,
        report: &mut ReconcileReport,
        kind: ActionKind,
        site: &SiteId,
        path: &NormalizedPath,
        apply: impl FnOnce() -> vhost_fs::Result<()>,
    ) -> Result<()> {
        let action = Action {
            kind,
            site: site.stem().to_string(),
            path: path.to_string(),
        };
        if !report.dry_run {
            apply()?;
            tracing::info!(%action, "applied");
        } else {
            tracing::info!(%action, "would apply");
        }
        report.actions.push(action);
        Ok(())
    }
}

fn conflict(report: &mut ReconcileReport, site: &SiteId, path: &NormalizedPath) {
    tracing::warn!(site = %site, path = %path, "site file is not managed; leaving it alone");
    report.conflicts.push(SiteNote::new(
        site.stem(),
        format!("{path} is not managed by vhostctl"),
    ));
}
