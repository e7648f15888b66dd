//! vhostctl
//!
//! Command-line front end for the domain store, the hostname resolver and the
//! site-config reconciler.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use commands::configure::ConfigureArgs;
use error::Result;
use vhost_core::HostConfig;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: cannot set up logging: {}", "warning".yellow().bold(), e);
    }
    tracing::debug!(root = %cli.root_dir.display(), "starting");

    match cli.command {
        Some(cmd) => {
            let config = HostConfig::load(cli.root_dir.as_path())?;
            execute_command(cmd, config, cli.verbose)
        }
        None => {
            println!("{} domain and site-config manager", "vhostctl".green().bold());
            println!();
            println!("Run {} for available commands.", "vhostctl --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cmd: Commands, config: HostConfig, verbose: bool) -> Result<()> {
    match cmd {
        Commands::Configure {
            no_reload,
            dry_run,
            json,
            sites,
        } => commands::run_configure(
            config,
            &ConfigureArgs {
                sites,
                dry_run,
                no_reload,
                json,
                verbose,
            },
        ),
        Commands::Find { hostname } => commands::run_find(&config, &hostname),
        Commands::List { json } => commands::run_list(&config, json),
        Commands::Create { name, htdocs } => commands::run_create(&config, name.as_deref(), htdocs),
        Commands::Destroy { name } => commands::run_destroy(&config, &name),
        Commands::Quota { name, value } => commands::run_quota(&config, &name, value.as_deref()),
    }
}
