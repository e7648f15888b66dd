//! Command implementations for vhost-cli

pub mod configure;
pub mod domains;
pub mod quota;

pub use configure::run_configure;
pub use domains::{run_create, run_destroy, run_find, run_list};
pub use quota::run_quota;

use vhost_core::{Domain, DomainResolver, HostConfig};

use crate::error::{CliError, Result};

/// Exact lookup of a domain or alias the user named.
pub(crate) fn lookup_domain(config: &HostConfig, name: &str) -> Result<Domain> {
    DomainResolver::new(config.prefix.clone())
        .lookup(name)
        .ok_or_else(|| CliError::user(format!("No such domain: {name}")))
}
