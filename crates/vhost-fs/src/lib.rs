//! Filesystem primitives for the vhost hosting tools
//!
//! Provides normalized path handling, atomic locked writes, scoped reads,
//! content checksums and format-agnostic config loading.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use constants::HostPath;
pub use error::{Error, Result};
pub use path::{EntryKind, NormalizedPath};
