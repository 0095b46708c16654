//! Filesystem helpers
//!
//! Recursive listing and removal plus idempotent nested directory creation.
//! Provisioning scripts lean on these for cleanup and layout work, so the
//! traversal order and failure policy are load-bearing:
//!
//! - [`list_dir`] yields every descendant of a directory before the
//!   directory itself, so a removal pass can delete entries front to back.
//! - [`rm_rf`] deletes exactly what [`list_dir`] produced; the walk root is
//!   not part of the listing and stays behind, emptied.
//! - [`mkdir_p`] succeeds silently on paths that already exist as
//!   directories.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::log;
use crate::config::ExecMode;
use crate::error::HelperError;

/// Options for [`mkdir_p`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MkdirOptions {
    /// Permission bits for created directories (Unix only).
    pub mode: Option<u32>,
    /// Return without touching the filesystem.
    pub noop: bool,
}

/// List all entries under `dir` recursively, children before parents.
///
/// Every path below `dir` appears exactly once; a directory appears
/// immediately after everything discovered while descending into it.
/// `dir` itself is not part of the listing. Symlinks are plain entries and
/// are never followed.
///
/// An unreadable directory is skipped with a debug line, keeping whatever
/// has been accumulated so far; any other IO failure propagates.
pub fn list_dir(dir: &Path, mode: &ExecMode) -> Result<Vec<PathBuf>, HelperError> {
    let mut entries = Vec::new();
    walk(dir, mode, &mut entries)?;
    Ok(entries)
}

fn walk(dir: &Path, mode: &ExecMode, entries: &mut Vec<PathBuf>) -> Result<(), HelperError> {
    let iter = match fs::read_dir(dir) {
        Ok(iter) => iter,
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            log::debug(mode, &format!("Ignoring file/dir: {}: {}", dir.display(), e));
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    for entry in iter {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            walk(&path, mode, entries)?;
        }
        entries.push(path);
    }
    Ok(())
}

/// Remove `path` recursively.
///
/// Symlinks and non-directories are deleted directly; a missing path is a
/// no-op. For a directory, every entry of its [`list_dir`] listing is
/// removed in order, contents before their parent directories. The listing
/// never contains `path` itself, so the emptied root directory is left
/// behind; callers that want it gone remove it afterwards.
///
/// In dry-run mode each would-be removal under `path` is logged and nothing
/// is deleted. The first deletion error aborts the whole operation.
pub fn rm_rf(path: &Path, mode: &ExecMode) -> Result<(), HelperError> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    if meta.file_type().is_symlink() || !meta.is_dir() {
        fs::remove_file(path)?;
        return Ok(());
    }

    for entry in list_dir(path, mode)? {
        if mode.dry_run {
            log::info(&format!("DRY RUN: Removing file/dir {}", entry.display()));
            continue;
        }

        if entry.is_dir() {
            fs::remove_dir(&entry)?;
        } else {
            fs::remove_file(&entry)?;
        }
    }
    Ok(())
}

/// Create each path in `list`, including missing ancestors.
///
/// A path that already exists as a directory is fine; one that exists as
/// anything else is an error. Returns the requested paths as given. With
/// `noop` set, returns immediately without touching the filesystem.
pub fn mkdir_p(list: &[PathBuf], opts: &MkdirOptions) -> Result<Vec<PathBuf>, HelperError> {
    if opts.noop {
        return Ok(list.to_vec());
    }

    for path in list {
        let path = strip_trailing_slash(path);

        // fast path: usually only the leaf is missing
        match make_dir(&path, opts.mode) {
            Ok(()) => continue,
            Err(_) if path.is_dir() => continue,
            Err(_) => {}
        }

        // Walk up to the root, then create top-down. Creation failures are
        // tolerated only for ancestors that already exist as directories.
        let mut stack = Vec::new();
        let mut cur = path.as_path();
        loop {
            stack.push(cur.to_path_buf());
            match cur.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => cur = parent,
                _ => break,
            }
        }
        for dir in stack.iter().rev() {
            if let Err(e) = make_dir(dir, opts.mode) {
                if !dir.is_dir() {
                    return Err(e.into());
                }
            }
        }
    }

    Ok(list.to_vec())
}

#[cfg(unix)]
pub(crate) fn make_dir(path: &Path, mode: Option<u32>) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    let mut builder = fs::DirBuilder::new();
    if let Some(mode) = mode {
        builder.mode(mode);
    }
    builder.create(path)
}

#[cfg(not(unix))]
pub(crate) fn make_dir(path: &Path, _mode: Option<u32>) -> io::Result<()> {
    fs::DirBuilder::new().create(path)
}

fn strip_trailing_slash(path: &Path) -> PathBuf {
    let s = path.to_string_lossy();
    if s.len() > 1 && s.ends_with('/') {
        let trimmed = s.trim_end_matches('/');
        if trimmed.is_empty() {
            PathBuf::from("/")
        } else {
            PathBuf::from(trimmed)
        }
    } else {
        path.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn mode() -> ExecMode {
        ExecMode::default()
    }

    #[test]
    fn test_list_dir_children_before_parent() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("a/b")).unwrap();
        fs::write(root.join("a/b/c.txt"), "x").unwrap();
        fs::write(root.join("top.txt"), "y").unwrap();

        let listing = list_dir(root, &mode()).unwrap();

        let pos = |p: &Path| listing.iter().position(|e| e == p).unwrap();
        assert!(pos(&root.join("a/b/c.txt")) < pos(&root.join("a/b")));
        assert!(pos(&root.join("a/b")) < pos(&root.join("a")));
        assert_eq!(listing.len(), 4);
        assert!(!listing.contains(&root.to_path_buf()));
    }

    #[test]
    fn test_list_dir_lists_each_entry_once() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("x/y")).unwrap();
        fs::write(root.join("x/a.txt"), "").unwrap();
        fs::write(root.join("x/y/b.txt"), "").unwrap();

        let mut listing = list_dir(root, &mode()).unwrap();
        let total = listing.len();
        listing.sort();
        listing.dedup();
        assert_eq!(listing.len(), total);
        assert_eq!(total, 4);
    }

    #[test]
    fn test_list_dir_does_not_follow_symlinks() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("real")).unwrap();
        fs::write(root.join("real/file.txt"), "").unwrap();
        #[cfg(unix)]
        std::os::unix::fs::symlink(root.join("real"), root.join("link")).unwrap();

        let listing = list_dir(root, &mode()).unwrap();

        // the link is a plain entry, its target's contents appear only once
        #[cfg(unix)]
        assert!(listing.contains(&root.join("link")));
        assert_eq!(
            listing
                .iter()
                .filter(|p| p.file_name() == Some("file.txt".as_ref()))
                .count(),
            1
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_list_dir_skips_unreadable_subtree() {
        use std::os::unix::fs::PermissionsExt;

        // permission bits do not apply to root
        if unsafe { libc::geteuid() } == 0 {
            return;
        }

        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir(root.join("open")).unwrap();
        fs::write(root.join("open/seen.txt"), "").unwrap();
        fs::create_dir(root.join("closed")).unwrap();
        fs::write(root.join("closed/hidden.txt"), "").unwrap();
        fs::set_permissions(root.join("closed"), fs::Permissions::from_mode(0o000)).unwrap();

        let listing = list_dir(root, &mode()).unwrap();

        assert!(listing.contains(&root.join("open/seen.txt")));
        assert!(listing.contains(&root.join("closed")));
        assert!(!listing.contains(&root.join("closed/hidden.txt")));

        fs::set_permissions(root.join("closed"), fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn test_rm_rf_empties_tree_but_leaves_root() {
        let temp = tempdir().unwrap();
        let a = temp.path().join("a");
        fs::create_dir_all(a.join("b")).unwrap();
        fs::write(a.join("b/c.txt"), "x").unwrap();

        rm_rf(&a, &mode()).unwrap();

        assert!(!a.join("b/c.txt").exists());
        assert!(!a.join("b").exists());
        assert!(a.exists());
        assert_eq!(fs::read_dir(&a).unwrap().count(), 0);
    }

    #[test]
    fn test_rm_rf_missing_path_is_noop() {
        let temp = tempdir().unwrap();
        rm_rf(&temp.path().join("nope"), &mode()).unwrap();
    }

    #[test]
    fn test_rm_rf_deletes_plain_file() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("f.txt");
        fs::write(&file, "x").unwrap();

        rm_rf(&file, &mode()).unwrap();
        assert!(!file.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_rm_rf_deletes_symlink_not_target() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("target");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep.txt"), "x").unwrap();
        let link = temp.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        rm_rf(&link, &mode()).unwrap();

        assert!(!link.exists());
        assert!(target.join("keep.txt").exists());
    }

    #[test]
    fn test_rm_rf_dry_run_deletes_nothing() {
        let temp = tempdir().unwrap();
        let a = temp.path().join("a");
        fs::create_dir_all(a.join("b")).unwrap();
        fs::write(a.join("b/c.txt"), "x").unwrap();

        let dry = ExecMode {
            dry_run: true,
            debug: false,
        };
        rm_rf(&a, &dry).unwrap();

        assert!(a.join("b/c.txt").exists());
        assert!(a.join("b").exists());
    }

    #[test]
    fn test_mkdir_p_creates_ancestors() {
        let temp = tempdir().unwrap();
        let leaf = temp.path().join("x/y/z");

        let created = mkdir_p(&[leaf.clone()], &MkdirOptions::default()).unwrap();

        assert!(temp.path().join("x").is_dir());
        assert!(temp.path().join("x/y").is_dir());
        assert!(leaf.is_dir());
        assert_eq!(created, vec![leaf]);
    }

    #[test]
    fn test_mkdir_p_is_idempotent() {
        let temp = tempdir().unwrap();
        let leaf = temp.path().join("x/y/z");

        mkdir_p(&[leaf.clone()], &MkdirOptions::default()).unwrap();
        let again = mkdir_p(&[leaf.clone()], &MkdirOptions::default()).unwrap();

        assert_eq!(again, vec![leaf]);
    }

    #[test]
    fn test_mkdir_p_multiple_paths() {
        let temp = tempdir().unwrap();
        let one = temp.path().join("one/deep");
        let two = temp.path().join("two");

        let created = mkdir_p(&[one.clone(), two.clone()], &MkdirOptions::default()).unwrap();

        assert!(one.is_dir());
        assert!(two.is_dir());
        assert_eq!(created, vec![one, two]);
    }

    #[test]
    fn test_mkdir_p_errors_on_existing_file() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("occupied");
        fs::write(&file, "x").unwrap();

        let result = mkdir_p(&[file], &MkdirOptions::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_mkdir_p_noop_touches_nothing() {
        let temp = tempdir().unwrap();
        let leaf = temp.path().join("ghost/dir");

        let opts = MkdirOptions {
            mode: None,
            noop: true,
        };
        let returned = mkdir_p(&[leaf.clone()], &opts).unwrap();

        assert_eq!(returned, vec![leaf.clone()]);
        assert!(!leaf.exists());
        assert!(!temp.path().join("ghost").exists());
    }

    #[test]
    fn test_mkdir_p_strips_trailing_slash() {
        let temp = tempdir().unwrap();
        let with_slash = PathBuf::from(format!("{}/trail/", temp.path().display()));

        let returned = mkdir_p(&[with_slash.clone()], &MkdirOptions::default()).unwrap();

        assert!(temp.path().join("trail").is_dir());
        // the caller's spelling is preserved in the return value
        assert_eq!(returned, vec![with_slash]);
    }

    #[cfg(unix)]
    #[test]
    fn test_mkdir_p_applies_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempdir().unwrap();
        let leaf = temp.path().join("modedir");

        let opts = MkdirOptions {
            mode: Some(0o700),
            noop: false,
        };
        mkdir_p(&[leaf.clone()], &opts).unwrap();

        let perms = fs::metadata(&leaf).unwrap().permissions();
        assert_eq!(perms.mode() & 0o777, 0o700);
    }
}
