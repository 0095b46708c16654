//! Provisioning helper functions
//!
//! This module contains all the functions available to provisioning
//! scripts. The helpers are plain Rust functions; [`register_all`] wires
//! them into the Rhai engine with the execution mode baked into each
//! registration, so scripts never see or touch the mode directly.
//!
//! ## Categories
//!
//! - **fs**: list_dir, rm_rf, mkdir_p, exists, is_dir
//! - **tmpname**: mktmpdir and the claim-and-retry allocator behind it
//! - **shell**: cmd, sh, command_available
//! - **pkg**: pkg_install, pkg_installed, require_pkg
//! - **log**: info, debug, warn

pub mod fs;
pub mod log;
pub mod pkg;
pub mod shell;
pub mod tmpname;

use std::path::{Path, PathBuf};

use rhai::{Array, Dynamic, Engine, EvalAltResult, Map};

use crate::config::ExecMode;

/// Register all helper functions with the Rhai engine.
pub fn register_all(engine: &mut Engine, mode: ExecMode) {
    // Filesystem helpers
    engine.register_fn(
        "list_dir",
        move |dir: &str| -> Result<Array, Box<EvalAltResult>> {
            fs::list_dir(Path::new(dir), &mode)
                .map(|entries| entries.iter().map(path_dynamic).collect())
                .map_err(|e| e.to_string().into())
        },
    );
    engine.register_fn(
        "rm_rf",
        move |path: &str| -> Result<(), Box<EvalAltResult>> {
            fs::rm_rf(Path::new(path), &mode).map_err(|e| e.to_string().into())
        },
    );
    engine.register_fn(
        "mkdir_p",
        move |path: &str| -> Result<String, Box<EvalAltResult>> {
            fs::mkdir_p(&[PathBuf::from(path)], &mkdir_opts(&mode))
                .map(|_| path.to_string())
                .map_err(|e| e.to_string().into())
        },
    );
    engine.register_fn(
        "mkdir_p",
        move |paths: Array| -> Result<Array, Box<EvalAltResult>> {
            let list: Vec<PathBuf> = paths.iter().map(|v| PathBuf::from(v.to_string())).collect();
            fs::mkdir_p(&list, &mkdir_opts(&mode))
                .map(|created| created.iter().map(path_dynamic).collect())
                .map_err(|e| e.to_string().into())
        },
    );
    engine.register_fn("exists", |path: &str| Path::new(path).exists());
    engine.register_fn("is_dir", |path: &str| Path::new(path).is_dir());

    // Scratch directories
    engine.register_fn("mktmpdir", || -> Result<String, Box<EvalAltResult>> {
        tmpname::mktmpdir("d", "", None)
            .map(path_string)
            .map_err(|e| e.to_string().into())
    });
    engine.register_fn(
        "mktmpdir",
        |template: Dynamic| -> Result<String, Box<EvalAltResult>> {
            let (prefix, suffix) =
                tmpname::parse_template(&template).map_err(|e| e.to_string())?;
            tmpname::mktmpdir(&prefix, &suffix, None)
                .map(path_string)
                .map_err(|e| e.to_string().into())
        },
    );
    engine.register_fn(
        "mktmpdir",
        |template: Dynamic, dir: &str| -> Result<String, Box<EvalAltResult>> {
            let (prefix, suffix) =
                tmpname::parse_template(&template).map_err(|e| e.to_string())?;
            tmpname::mktmpdir(&prefix, &suffix, Some(Path::new(dir)))
                .map(path_string)
                .map_err(|e| e.to_string().into())
        },
    );

    // Shell helpers
    engine.register_fn(
        "cmd",
        move |line: &str| -> Result<bool, Box<EvalAltResult>> {
            shell::cmd(line, &mode).map_err(|e| e.to_string().into())
        },
    );
    engine.register_fn(
        "sh",
        move |line: &str| -> Result<bool, Box<EvalAltResult>> {
            shell::cmd(line, &mode).map_err(|e| e.to_string().into())
        },
    );
    engine.register_fn("command_available", |name: &str| {
        shell::command_available(name)
    });

    // Package helpers
    engine.register_fn(
        "pkg_install",
        move |name: &str| -> Result<(), Box<EvalAltResult>> {
            pkg::install(&[name.to_string()], &[], &mode).map_err(|e| e.to_string().into())
        },
    );
    engine.register_fn(
        "pkg_install",
        move |names: Array| -> Result<(), Box<EvalAltResult>> {
            pkg::install(&string_list(names), &[], &mode).map_err(|e| e.to_string().into())
        },
    );
    engine.register_fn(
        "pkg_install",
        move |names: Array, opts: Map| -> Result<(), Box<EvalAltResult>> {
            let opts: Vec<(String, String)> = opts
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            pkg::install(&string_list(names), &opts, &mode).map_err(|e| e.to_string().into())
        },
    );
    engine.register_fn("pkg_installed", |name: &str| pkg::installed(name));
    engine.register_fn(
        "require_pkg",
        |name: &str| -> Result<(), Box<EvalAltResult>> {
            pkg::require(name).map_err(|e| e.to_string().into())
        },
    );

    // Logging helpers
    engine.register_fn("info", |msg: &str| log::info(msg));
    engine.register_fn("warn", |msg: &str| log::warn(msg));
    engine.register_fn("debug", move |msg: &str| log::debug(&mode, msg));
}

fn mkdir_opts(mode: &ExecMode) -> fs::MkdirOptions {
    fs::MkdirOptions {
        mode: None,
        noop: mode.dry_run,
    }
}

fn string_list(values: Array) -> Vec<String> {
    values.into_iter().map(|v| v.to_string()).collect()
}

fn path_string(path: PathBuf) -> String {
    path.to_string_lossy().into_owned()
}

fn path_dynamic(path: &PathBuf) -> Dynamic {
    Dynamic::from(path.to_string_lossy().into_owned())
}
