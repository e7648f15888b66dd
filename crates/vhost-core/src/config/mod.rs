//! Hosting configuration
//!
//! [`HostConfig`] is built from an explicit root directory and threaded
//! through every entry point; nothing reads a process-wide default.
//!
//! # Layout defaults
//!
//! Relative to `root_dir`:
//!
//! - `srv/`: domain prefix
//! - `etc/apache2/`: `sites-available/` and `sites-enabled/`
//! - `etc/symbiosis/apache.d/`: templates and the mass-hosting toggle
//!
//! # Overrides
//!
//! `etc/symbiosis/vhost.toml` may override any of these:
//!
//! ```toml
//! prefix = "srv"
//! apache_dir = "etc/apache2"
//! template_dir = "etc/symbiosis/apache.d"
//! explicit_policy = "additive"   # or "exclusive"
//! error_policy = "continue"      # or "abort"
//! reload_command = ["/usr/sbin/apache2ctl", "graceful"]
//! ```

mod host;
mod overrides;

pub use host::{ErrorPolicy, ExplicitPolicy, HostConfig, MASS_HOSTING_TOGGLE};
pub use overrides::HostOverrides;
