//! Shell command execution
//!
//! Provisioning scripts shell out constantly, so command execution is a
//! builder with consistent failure handling: output is suppressed unless
//! debugging, failures raise by default, and dry-run reports the command
//! without spawning it.

use std::process::{Command, Stdio};

use super::log;
use crate::config::ExecMode;
use crate::error::HelperError;

/// Builder for shell command execution.
///
/// # Example
/// ```ignore
/// ShellCmd::new("systemctl restart nginx")
///     .check(false)
///     .run(&mode)?;
/// ```
#[derive(Clone)]
pub struct ShellCmd {
    cmd: String,
    quiet: Option<bool>,
    check: bool,
}

impl ShellCmd {
    /// Create a new shell command.
    pub fn new(cmd: impl Into<String>) -> Self {
        Self {
            cmd: cmd.into(),
            quiet: None,
            check: true,
        }
    }

    /// Suppress child stdout/stderr. Unset, commands are quiet unless the
    /// run is in debug mode.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = Some(quiet);
        self
    }

    /// Treat a non-zero exit as an error (default true).
    pub fn check(mut self, check: bool) -> Self {
        self.check = check;
        self
    }

    /// Run the command through `sh -c`, returning whether it succeeded.
    ///
    /// In dry-run mode the command is logged and reported successful
    /// without being spawned.
    pub fn run(&self, mode: &ExecMode) -> Result<bool, HelperError> {
        if mode.dry_run {
            log::info(&format!("DRY RUN: {}", self.cmd));
            return Ok(true);
        }

        log::debug(mode, &self.cmd);

        let quiet = self.quiet.unwrap_or(!mode.debug);
        let mut command = Command::new("sh");
        command.args(["-c", &self.cmd]).stdin(Stdio::null());
        if quiet {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }

        let status = command.status()?;
        if self.check && !status.success() {
            return Err(HelperError::CommandFailed {
                cmd: self.cmd.clone(),
                code: status.code(),
            });
        }
        Ok(status.success())
    }

    /// Get the full command string.
    pub fn cmd(&self) -> &str {
        &self.cmd
    }
}

/// Run a shell command with default settings.
pub fn cmd(line: &str, mode: &ExecMode) -> Result<bool, HelperError> {
    ShellCmd::new(line).run(mode)
}

/// Check whether a command is available on PATH.
pub fn command_available(name: &str) -> bool {
    Command::new("sh")
        .args(["-c", &format!("which {name} > /dev/null 2>&1")])
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
