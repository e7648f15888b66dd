//! Domain commands: find, list, create and destroy

use colored::Colorize;
use serde::Serialize;

use vhost_core::hostname;
use vhost_core::{Domain, DomainResolver, HostConfig};

use crate::error::{CliError, Result};

/// One row of `list --json`.
#[derive(Debug, Serialize)]
struct DomainEntry {
    name: String,
    primary: String,
    alias: bool,
    htdocs: bool,
}

/// Run the find command
///
/// Not finding a domain is an error so that scripts can test the exit code.
pub fn run_find(config: &HostConfig, hostname: &str) -> Result<()> {
    let resolver = DomainResolver::new(config.prefix.clone());
    let domain = resolver
        .find(hostname)
        .ok_or_else(|| CliError::user(format!("No domain serves {hostname}")))?;

    println!("{} {} {}", hostname, "=>".blue().bold(), domain.name().green());
    println!("   {} {}", "primary:".dimmed(), domain.primary_name());

    let aliases = domain.aliases()?;
    if !aliases.is_empty() {
        let aliases: Vec<&str> = aliases.iter().map(String::as_str).collect();
        println!("   {} {}", "aliases:".dimmed(), aliases.join(", "));
    }
    Ok(())
}

/// Run the list command
pub fn run_list(config: &HostConfig, json: bool) -> Result<()> {
    let mut domains = DomainResolver::new(config.prefix.clone()).enumerate();
    domains.sort_by(|a, b| a.name().cmp(b.name()));

    if json {
        let entries: Vec<DomainEntry> = domains
            .iter()
            .map(|d| DomainEntry {
                name: d.name().to_string(),
                primary: d.primary_name().to_string(),
                alias: d.is_alias(),
                htdocs: d.has_htdocs(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if domains.is_empty() {
        println!("{}", "No domains.".dimmed());
        return Ok(());
    }
    for domain in &domains {
        if domain.is_alias() {
            println!(
                "{} {}",
                domain.name(),
                format!("-> {}", domain.primary_name()).dimmed()
            );
        } else if domain.has_htdocs() {
            println!("{}", domain.name().green());
        } else {
            println!("{} {}", domain.name(), "(unpublished)".dimmed());
        }
    }
    Ok(())
}

/// Run the create command
pub fn run_create(config: &HostConfig, name: Option<&str>, htdocs: bool) -> Result<()> {
    let domain = Domain::create(&config.prefix, name)?;
    if htdocs {
        domain.create_htdocs()?;
    }
    println!("{} Created {}", "OK".green().bold(), domain.name().cyan());
    Ok(())
}

/// Run the destroy command
pub fn run_destroy(config: &HostConfig, name: &str) -> Result<()> {
    let name = hostname::normalize_hostname(name)
        .ok_or_else(|| CliError::user(format!("Invalid domain name: {name}")))?;
    let domain = Domain::new(name, config.prefix.clone());

    if !domain.directory().is_occupied() {
        println!("{} Nothing to remove for {}", "OK".green().bold(), domain.name());
        return Ok(());
    }

    domain.destroy()?;
    println!("{} Removed {}", "OK".green().bold(), domain.name().cyan());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vhost_test_utils::TestHost;

    fn config(host: &TestHost) -> HostConfig {
        HostConfig::for_root(host.root())
    }

    #[test]
    fn test_create_then_destroy() {
        let host = TestHost::new();

        run_create(&config(&host), Some("example.com"), true).unwrap();
        assert!(host.domain_dir("example.com").join("public/htdocs").is_dir());

        run_destroy(&config(&host), "example.com").unwrap();
        assert!(!host.domain_dir("example.com").exists());

        run_destroy(&config(&host), "example.com").unwrap();
    }

    #[test]
    fn test_find_missing_domain_fails() {
        let host = TestHost::new();
        assert!(run_find(&config(&host), "nowhere.example").is_err());
    }

    #[test]
    fn test_find_and_list() {
        let host = TestHost::new();
        host.add_domain("example.com");

        run_find(&config(&host), "www.example.com").unwrap();
        run_list(&config(&host), false).unwrap();
        run_list(&config(&host), true).unwrap();
    }

    #[test]
    fn test_destroy_rejects_invalid_name() {
        let host = TestHost::new();
        assert!(matches!(
            run_destroy(&config(&host), "../etc"),
            Err(CliError::User { .. })
        ));
    }
}
