//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// vhostctl - manage hosted domains and their web-server site configs
#[derive(Parser, Debug)]
#[command(name = "vhostctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Filesystem root the hosting layout lives under
    #[arg(long, global = true, env = "VHOST_ROOT", default_value = "/")]
    pub root_dir: PathBuf,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Generate, enable and prune site configs
    ///
    /// Without SITE arguments every domain is considered and stale generated
    /// sites are removed. With SITE arguments only those sites are touched.
    ///
    /// Examples:
    ///   vhostctl configure                      # full sweep
    ///   vhostctl configure example.com          # one domain
    ///   vhostctl configure zz-mass-hosting      # re-enable mass hosting
    ///   vhostctl configure --dry-run --json     # plan only, machine-readable
    Configure {
        /// Do not reload the web server afterwards
        #[arg(long)]
        no_reload: bool,

        /// Report what would change without changing anything
        #[arg(long)]
        dry_run: bool,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,

        /// Domains or mass-hosting site names to act on
        sites: Vec<String>,
    },

    /// Show which domain serves a hostname
    Find {
        /// Hostname as a client would request it
        hostname: String,
    },

    /// List every domain and alias
    List {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Create a domain (a random name when NAME is omitted)
    Create {
        /// Domain name
        name: Option<String>,

        /// Also create the document root
        #[arg(long)]
        htdocs: bool,
    },

    /// Remove a domain or alias
    Destroy {
        /// Domain name
        name: String,
    },

    /// Show or set a domain's FTP quota
    Quota {
        /// Domain name
        name: String,

        /// New quota, e.g. 500M or 2.5G
        value: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_configure_with_sites() {
        let cli = Cli::parse_from([
            "vhostctl",
            "--root-dir",
            "/tmp/host",
            "configure",
            "--dry-run",
            "example.com",
            "zz-mass-hosting",
        ]);

        assert_eq!(cli.root_dir, PathBuf::from("/tmp/host"));
        assert_eq!(
            cli.command,
            Some(Commands::Configure {
                no_reload: false,
                dry_run: true,
                json: false,
                sites: vec!["example.com".into(), "zz-mass-hosting".into()],
            })
        );
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["vhostctl", "list", "-v", "--root-dir", "/srv-root"]);
        assert!(cli.verbose);
        assert_eq!(cli.root_dir, PathBuf::from("/srv-root"));
    }

    #[test]
    fn parse_quota_without_value() {
        let cli = Cli::parse_from(["vhostctl", "quota", "example.com"]);
        assert_eq!(
            cli.command,
            Some(Commands::Quota {
                name: "example.com".into(),
                value: None,
            })
        );
    }

    #[test]
    fn parse_create_random() {
        let cli = Cli::parse_from(["vhostctl", "create", "--htdocs"]);
        assert_eq!(
            cli.command,
            Some(Commands::Create {
                name: None,
                htdocs: true,
            })
        );
    }
}
