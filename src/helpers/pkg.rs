//! Debian package glue
//!
//! Thin wrappers over dpkg-query and apt-get. Queries go straight to
//! dpkg-query regardless of execution mode; only the apt-get install goes
//! through [`ShellCmd`] and is therefore dry-run aware.

use std::process::Command;

use super::log;
use super::shell::ShellCmd;
use crate::config::ExecMode;
use crate::error::HelperError;

/// Check whether a Debian package is installed.
pub fn installed(name: &str) -> bool {
    Command::new("sh")
        .args(["-c", &format!("dpkg-query --show {name} > /dev/null 2>&1")])
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Error unless a Debian package is installed.
pub fn require(name: &str) -> Result<(), HelperError> {
    if installed(name) {
        Ok(())
    } else {
        Err(HelperError::MissingPackage(name.to_string()))
    }
}

/// Install Debian packages via apt-get, skipping ones already present.
///
/// `extra_opts` are passed through to apt-get as `flag value` pairs before
/// the package names.
pub fn install(
    names: &[String],
    extra_opts: &[(String, String)],
    mode: &ExecMode,
) -> Result<(), HelperError> {
    let pending: Vec<&str> = names
        .iter()
        .filter(|name| {
            if installed(name) {
                log::debug(mode, &format!("Package {name} already installed, skipping"));
                false
            } else {
                true
            }
        })
        .map(String::as_str)
        .collect();

    if pending.is_empty() {
        return Ok(());
    }

    let pkgs = pending.join(" ");
    log::info(&format!("Installing package(s) {pkgs}..."));

    let mut line = String::from("DEBIAN_FRONTEND=noninteractive apt-get install -y");
    for (flag, value) in extra_opts {
        line.push(' ');
        line.push_str(flag);
        line.push(' ');
        line.push_str(value);
    }
    line.push(' ');
    line.push_str(&pkgs);

    match ShellCmd::new(line).run(mode) {
        Ok(_) => Ok(()),
        Err(HelperError::CommandFailed { .. }) => Err(HelperError::InstallFailed(pkgs)),
        Err(e) => Err(e),
    }
}
