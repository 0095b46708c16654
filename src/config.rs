//! Process-wide execution modes.
//!
//! Helpers never read the environment themselves; the mode is resolved once
//! and passed in, so tests can run helpers in any mode deterministically.

/// Execution modes for a provisioning run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecMode {
    /// Report destructive operations instead of performing them.
    pub dry_run: bool,
    /// Emit debug logging and let command output through.
    pub debug: bool,
}

impl ExecMode {
    /// Resolve the mode from the `DRY_RUN` and `DEBUG` environment toggles.
    ///
    /// Presence alone turns a toggle on; provisioning scripts are invoked
    /// as `DRY_RUN=1 ...` regardless of the value.
    pub fn from_env() -> Self {
        Self {
            dry_run: std::env::var_os("DRY_RUN").is_some(),
            debug: std::env::var_os("DEBUG").is_some(),
        }
    }
}
