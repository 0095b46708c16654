//! Rhai-scripted host provisioning helpers for LevitateOS
//!
//! Provisioning scripts are Rhai programs that prepare a host: lay out
//! directory trees, clean up build debris, allocate scratch directories, run
//! shell commands, and install Debian packages. The engine registers the
//! helper functions and executes the script.
//!
//! # Example Script
//!
//! ```rhai
//! mkdir_p("/srv/app/shared/log");
//!
//! let scratch = mktmpdir("deploy");
//! cmd(`tar xzf /tmp/app.tar.gz -C ${scratch}`);
//!
//! rm_rf("/srv/app/releases/stale");
//!
//! pkg_install(["nginx", "postgresql-client"]);
//! ```
//!
//! # Engine-Provided Functions
//!
//! ## Filesystem
//! - `list_dir(dir)` - Recursively list entries, children before parents
//! - `rm_rf(path)` - Recursively delete a path's contents
//! - `mkdir_p(path)` / `mkdir_p([paths])` - Create directories with ancestors
//! - `mktmpdir()` / `mktmpdir(template)` / `mktmpdir(template, dir)` -
//!   Allocate a fresh private scratch directory
//! - `exists(path)`, `is_dir(path)` - Path probes
//!
//! ## Shell
//! - `cmd(line)` / `sh(line)` - Run a shell command, error on failure
//! - `command_available(name)` - Check a command exists on PATH
//!
//! ## Packages
//! - `pkg_install(names)` - Install Debian packages via apt-get
//! - `pkg_installed(name)` - Query dpkg for an installed package
//! - `require_pkg(name)` - Error unless a package is installed
//!
//! ## Logging
//! - `info(msg)`, `warn(msg)`, `debug(msg)`
//!
//! # Execution Modes
//!
//! Destructive helpers honor a process-wide dry-run mode: with `DRY_RUN` set
//! in the environment, `rm_rf`, `mkdir_p`, and `cmd` report what they would
//! do without touching the host. `DEBUG` turns on debug logging and lets
//! command output through. The mode is resolved once ([`ExecMode::from_env`])
//! and passed into the engine, never read ad hoc.

pub mod config;
pub mod engine;
pub mod error;
pub mod helpers;

pub use config::ExecMode;
pub use engine::ProvisionEngine;
pub use error::HelperError;
