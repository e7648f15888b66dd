//! The quota command

use colored::Colorize;

use vhost_core::HostConfig;

use super::lookup_domain;
use crate::error::Result;

/// Show the FTP quota, or set it when `value` is given.
pub fn run_quota(config: &HostConfig, name: &str, value: Option<&str>) -> Result<()> {
    let domain = lookup_domain(config, name)?;

    if let Some(value) = value {
        domain.set_ftp_quota(value)?;
        println!(
            "{} FTP quota for {} set to {}",
            "OK".green().bold(),
            domain.name().cyan(),
            domain.ftp_quota()?
        );
        return Ok(());
    }

    println!("{}", domain.ftp_quota()?);
    Ok(())
}
