//! Web server reload

use std::process::Command;

use crate::{Error, Result};

/// Tells the web server to pick up changed site configs.
pub trait Reloader {
    fn reload(&self) -> Result<()>;
}

/// Runs an external program, e.g. `apache2ctl graceful`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReloader {
    command: Vec<String>,
}

impl CommandReloader {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }
}

impl Reloader for CommandReloader {
    fn reload(&self) -> Result<()> {
        let Some((program, args)) = self.command.split_first() else {
            return Err(Error::ReloadFailed {
                reason: "no reload command configured".to_string(),
            });
        };

        tracing::info!(command = %self.command.join(" "), "reloading web server");
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| Error::ReloadFailed {
                reason: format!("cannot run {program}: {e}"),
            })?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(Error::ReloadFailed {
                reason: format!("{program} exited with {}: {}", output.status, stderr.trim()),
            })
        }
    }
}

/// Does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReloader;

impl Reloader for NoopReloader {
    fn reload(&self) -> Result<()> {
        Ok(())
    }
}
