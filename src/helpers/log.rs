//! Logging helpers
//!
//! Severity-prefixed terminal output: informational lines on stdout,
//! warnings and errors on stderr.

use owo_colors::OwoColorize;

use crate::config::ExecMode;

/// Print an info message to stdout.
/// Example: "INFO: Installing package(s) curl..."
pub fn info(msg: &str) {
    println!("{} {}", "INFO:".cyan(), msg);
}

/// Print a warning message to stderr.
pub fn warn(msg: &str) {
    eprintln!("{} {}", "WARN:".yellow().bold(), msg);
}

/// Print an error message to stderr.
pub fn error(msg: &str) {
    eprintln!("{} {}", "ERROR:".red().bold(), msg);
}

/// Print a debug message (only in debug mode).
pub fn debug(mode: &ExecMode, msg: &str) {
    if mode.debug {
        println!("{} {}", "DEBUG:".dimmed(), msg);
    }
}
