//! Shared test utilities for the vhost workspace.
//!
//! Dev-dependency only. Fixtures work on plain paths so that any crate in the
//! workspace can use them without depending on `vhost-core`.
//!
//! # Modules
//!
//! - [`host`]: [`TestHost`] builder for a throwaway hosting root

pub mod host;

pub use host::TestHost;
