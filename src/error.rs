//! Helper error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while running provisioning helpers.
#[derive(Error, Debug)]
pub enum HelperError {
    #[error("unexpected tmpname template: {0}")]
    InvalidTemplate(String),

    #[error("cannot generate temporary name using `{template}' under `{dir}'")]
    TmpnameExhausted { template: String, dir: PathBuf },

    #[error("command failed: {cmd} (exit code: {code:?})")]
    CommandFailed { cmd: String, code: Option<i32> },

    #[error("Debian package '{0}' is required but not installed")]
    MissingPackage(String),

    #[error("installing package(s) {0} failed")]
    InstallFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
