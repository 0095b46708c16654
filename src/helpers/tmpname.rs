//! Collision-safe temporary name allocation
//!
//! Scratch directories get probabilistically-unique names built from the
//! clock, the process id, and a random component. The name alone guarantees
//! nothing: [`create`] claims a candidate by attempting an atomic create and
//! retries with an incrementing disambiguator when the name is taken.
//! Existence is never pre-checked; the claim's atomicity is the only defense
//! against other processes racing for the same name.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use rhai::Dynamic;

use super::fs::{make_dir, rm_rf};
use crate::config::ExecMode;
use crate::error::HelperError;

/// Upper bound for the random name component.
const RANDOM_BOUND: u32 = 429_496_729;

/// Permission bits for scratch directories.
const TMPDIR_MODE: u32 = 0o700;

/// Parse a name template from a script value.
///
/// Accepts a plain prefix string or a `[prefix, suffix]` pair; anything
/// else is rejected.
pub fn parse_template(value: &Dynamic) -> Result<(String, String), HelperError> {
    if let Some(prefix) = value.clone().try_cast::<String>() {
        return Ok((prefix, String::new()));
    }
    if let Some(parts) = value.clone().try_cast::<rhai::Array>() {
        if let [prefix, suffix] = parts.as_slice() {
            if let (Some(prefix), Some(suffix)) = (
                prefix.clone().try_cast::<String>(),
                suffix.clone().try_cast::<String>(),
            ) {
                return Ok((prefix, suffix));
            }
        }
    }
    Err(HelperError::InvalidTemplate(format!("{value:?}")))
}

/// Build one candidate name from the template.
///
/// Two calls in the same process in the same instant may legitimately
/// collide; collision handling belongs to [`create`], not here.
pub fn make_tmpname(prefix: &str, suffix: &str, n: Option<u32>) -> String {
    let t = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0);
    let random = rand::thread_rng().gen_range(0..RANDOM_BOUND);

    let mut name = format!("{}{}-{}-{}", prefix, t, process::id(), base36(random));
    if let Some(n) = n {
        name.push('-');
        name.push_str(&n.to_string());
    }
    name.push_str(suffix);
    name
}

fn base36(mut value: u32) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = String::new();
    while value > 0 {
        out.insert(0, DIGITS[(value % 36) as usize] as char);
        value /= 36;
    }
    out
}

/// Allocate a unique path under `tmpdir` by claiming candidates.
///
/// `claim` must atomically create something at the candidate path and fail
/// with [`io::ErrorKind::AlreadyExists`] when the name is taken; that
/// failure triggers a retry with the next disambiguator (1, 2, ...). Any
/// other claim failure propagates unchanged, not retried. `max_try` bounds
/// the total number of claim attempts; unset retries until a claim sticks.
///
/// On success returns the claimed path.
pub fn create<F>(
    prefix: &str,
    suffix: &str,
    tmpdir: Option<&Path>,
    max_try: Option<u32>,
    mut claim: F,
) -> Result<PathBuf, HelperError>
where
    F: FnMut(&Path) -> io::Result<()>,
{
    let tmpdir = tmpdir.map(Path::to_path_buf).unwrap_or_else(env::temp_dir);
    let mut n: Option<u32> = None;

    loop {
        let path = tmpdir.join(make_tmpname(prefix, suffix, n));
        match claim(&path) {
            Ok(()) => return Ok(path),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                let next = n.unwrap_or(0) + 1;
                if max_try.is_some_and(|max| next >= max) {
                    return Err(HelperError::TmpnameExhausted {
                        template: display_template(prefix, suffix),
                        dir: tmpdir,
                    });
                }
                n = Some(next);
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn display_template(prefix: &str, suffix: &str) -> String {
    if suffix.is_empty() {
        prefix.to_string()
    } else {
        format!("[{prefix}, {suffix}]")
    }
}

/// Create a private scratch directory and return its path.
///
/// The directory is made with mode 0o700; the claim is the `mkdir` itself,
/// so a lost race simply retries with the next candidate.
pub fn mktmpdir(
    prefix: &str,
    suffix: &str,
    tmpdir: Option<&Path>,
) -> Result<PathBuf, HelperError> {
    create(prefix, suffix, tmpdir, None, |path| {
        make_dir(path, Some(TMPDIR_MODE))
    })
}

/// Run `f` inside a fresh scratch directory, cleaning up afterwards.
///
/// Cleanup runs whether `f` succeeds or fails: the created path is passed
/// to [`rm_rf`] explicitly, then the emptied directory itself is deleted.
/// In dry-run mode the directory is left in place, like every other
/// destructive operation.
pub fn with_tmpdir<T, F>(prefix: &str, mode: &ExecMode, f: F) -> Result<T, HelperError>
where
    F: FnOnce(&Path) -> Result<T, HelperError>,
{
    let path = mktmpdir(prefix, "", None)?;
    let result = f(&path);
    let cleanup = remove_tree(&path, mode);
    match result {
        Ok(value) => cleanup.map(|_| value),
        Err(e) => Err(e),
    }
}

fn remove_tree(path: &Path, mode: &ExecMode) -> Result<(), HelperError> {
    rm_rf(path, mode)?;
    if !mode.dry_run {
        fs::remove_dir(path)?;
    }
    Ok(())
}
