//! The configure command: run one reconciliation

use colored::Colorize;

use vhost_core::HostConfig;
use vhost_core::reconcile::{ActionKind, ReconcileOptions, ReconcileReport, Reconciler};

use crate::error::{CliError, Result};

/// Options for [`run_configure`], straight from the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigureArgs {
    pub sites: Vec<String>,
    pub dry_run: bool,
    pub no_reload: bool,
    pub json: bool,
    pub verbose: bool,
}

/// Run the configure command
///
/// Fails when any site failed, after printing the full report.
pub fn run_configure(config: HostConfig, args: &ConfigureArgs) -> Result<()> {
    let options = ReconcileOptions::targets(args.sites.iter().cloned())
        .dry_run(args.dry_run)
        .no_reload(args.no_reload);

    if !args.json {
        let what = if args.sites.is_empty() {
            "all sites".to_string()
        } else {
            args.sites.join(", ")
        };
        println!("{} Configuring {}...", "=>".blue().bold(), what);
    }

    let report = Reconciler::new(config).run(&options)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, args.verbose);
    }

    if report.success() {
        Ok(())
    } else {
        Err(CliError::user(format!(
            "{} site(s) failed to configure",
            report.errors.len()
        )))
    }
}

fn print_report(report: &ReconcileReport, verbose: bool) {
    let verb = if report.dry_run { "would " } else { "" };
    for action in &report.actions {
        let marker = match action.kind {
            ActionKind::RemovedEnabled | ActionKind::RemovedAvailable => "-".red(),
            ActionKind::UpdatedAvailable | ActionKind::UpdatedEnabled => "~".yellow(),
            ActionKind::WroteAvailable | ActionKind::Enabled => "+".green(),
        };
        println!("   {} {}{}", marker, verb, action);
    }

    if verbose {
        for note in &report.skipped {
            println!("   {} {}", "skip".dimmed(), note.to_string().dimmed());
        }
        for entry in &report.unmanaged {
            println!("   {} {}", "unmanaged".dimmed(), entry.dimmed());
        }
    }
    for note in &report.conflicts {
        println!("   {} {}", "conflict".yellow().bold(), note);
    }
    for note in &report.errors {
        println!("   {} {}", "error".red().bold(), note);
    }

    if report.aborted {
        println!("{} Stopped at the first failure.", "ABORTED".red().bold());
    } else if report.is_clean() {
        println!("{} Nothing to change.", "OK".green().bold());
    } else if report.dry_run {
        println!(
            "{} {} change(s) planned; nothing written.",
            "DRY RUN".yellow().bold(),
            report.actions.len()
        );
    } else {
        let reload = if report.reloaded {
            "; web server reloaded"
        } else {
            ""
        };
        println!(
            "{} Applied {} change(s){}.",
            "OK".green().bold(),
            report.mutations(),
            reload
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vhost_test_utils::TestHost;

    fn args(sites: &[&str]) -> ConfigureArgs {
        ConfigureArgs {
            sites: sites.iter().map(|s| s.to_string()).collect(),
            no_reload: true,
            ..ConfigureArgs::default()
        }
    }

    #[test]
    fn test_configure_sweep() {
        let host = TestHost::new();
        run_configure(HostConfig::for_root(host.root()), &args(&[])).unwrap();
        host.assert_enabled("zz-mass-hosting.conf");
    }

    #[test]
    fn test_configure_dry_run_json() {
        let host = TestHost::new();
        let mut args = args(&[]);
        args.dry_run = true;
        args.json = true;

        run_configure(HostConfig::for_root(host.root()), &args).unwrap();

        host.assert_not_enabled("zz-mass-hosting.conf");
    }

    #[test]
    fn test_configure_invalid_target_fails() {
        let host = TestHost::new();
        let result = run_configure(HostConfig::for_root(host.root()), &args(&["$(ls)"]));
        assert!(matches!(result, Err(CliError::User { .. })));
    }
}
