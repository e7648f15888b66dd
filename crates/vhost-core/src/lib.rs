//! Core layer for vhost
//!
//! This crate owns the hosting model on top of `vhost-fs`:
//!
//! - **Domain store**: domain directories, alias symlinks and attribute files
//! - **Quota codec**: human-readable byte quantities such as `2.5G`
//! - **Resolver**: hostname to domain, with `www.` and prefix stripping
//! - **Reconciler**: generated web-server site configs kept in line with the
//!   domains on disk
//!
//! # Architecture
//!
//! ```text
//!                  vhost-cli
//!                      |
//!                  vhost-core
//!     +--------+-------+--------+-----------+
//!     |        |       |        |           |
//!   quota   domain  resolver  config    reconcile
//!                      |
//!                   vhost-fs
//! ```
//!
//! Every entry point takes its hosting root explicitly, through a
//! [`config::HostConfig`] or a plain root path. Nothing is cached between
//! calls.
//!
//! # Example
//!
//! ```ignore
//! use vhost_core::{DomainResolver, HostConfig};
//!
//! let config = HostConfig::load("/")?;
//! let resolver = DomainResolver::new(config.prefix.clone());
//! if let Some(domain) = resolver.find("www.example.com") {
//!     println!("served by {}", domain.primary_name());
//! }
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod hostname;
pub mod quota;
pub mod reconcile;
pub mod resolver;

pub use config::{ErrorPolicy, ExplicitPolicy, HostConfig, HostOverrides};
pub use domain::{AttributeKey, AttributeStore, Domain, DomainSettings};
pub use error::{Error, Result};
pub use quota::Quota;
pub use reconcile::{ReconcileOptions, ReconcileReport, Reconciler};
pub use resolver::{DomainIndex, DomainResolver};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_render_failed_names_the_site() {
        let error = Error::RenderFailed {
            site: "example.com".into(),
            reason: "unknown placeholder(s): nope".into(),
        };

        let display = error.to_string();
        assert!(display.contains("example.com"), "got: {display}");
        assert!(display.contains("nope"), "got: {display}");
    }

    #[test]
    fn fs_errors_convert_transparently() {
        let fs_error = vhost_fs::Error::UnsupportedFormat {
            extension: "ini".into(),
        };
        let message = fs_error.to_string();

        let error: Error = fs_error.into();
        assert_eq!(error.to_string(), message);
    }
}
