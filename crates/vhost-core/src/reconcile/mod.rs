//! Site-config reconciliation
//!
//! A run compares the sites that *should* exist, derived from the domains
//! under the prefix and the mass-hosting toggle, with the generated files in
//! `sites-available` and `sites-enabled`, then writes, links and removes
//! files until the two agree.
//!
//! Only files carrying the generated-file header (see [`managed`]) and
//! symlinks to them are ever touched. Everything else, including a generated
//! file someone has edited, is reported and left alone.
//!
//! ```ignore
//! use vhost_core::config::HostConfig;
//! use vhost_core::reconcile::{ReconcileOptions, Reconciler};
//!
//! let reconciler = Reconciler::new(HostConfig::load("/")?);
//! let report = reconciler.run(&ReconcileOptions::sweep())?;
//! assert!(report.success());
//! ```

mod engine;
mod inventory;
pub mod managed;
mod plan;
mod reload;
mod render;
mod report;
mod site;

pub use engine::{ReconcileOptions, Reconciler};
pub use inventory::{Available, Enabled, Inventory, SiteFiles};
pub use plan::{DesiredSite, Plan, Scope};
pub use reload::{CommandReloader, NoopReloader, Reloader};
pub use render::{
    DomainContext, SiteContext, SiteRenderer, TemplateRenderer, builtin_template, expand,
};
pub use report::{Action, ActionKind, ReconcileReport, SiteNote};
pub use site::{CONF_SUFFIX, MASS_HOSTING, MASS_HOSTING_SSL, SiteId};
