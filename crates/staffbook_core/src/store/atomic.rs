//! Write-to-temp-then-rename file replacement.
//!
//! # Invariants
//! - The target path never holds a partially written document.
//! - Temporary files live in the target's directory and carry a `.tmp` suffix,
//!   so record scans never pick them up.

use log::warn;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::{Builder, NamedTempFile};

/// Replaces `target` with `bytes` in one step.
///
/// The payload is fully written and synced to a sibling temp file first and
/// then renamed over the target. When that rename is refused, the old target
/// is removed and the temp file is renamed again, so the target is never
/// opened for writing. The temp file is removed if both renames fail.
pub fn write_atomically(target: &Path, bytes: &[u8]) -> io::Result<()> {
    write_atomically_with(target, bytes, |from, to| fs::rename(from, to))
}

fn write_atomically_with<F>(target: &Path, bytes: &[u8], mut rename: F) -> io::Result<()>
where
    F: FnMut(&Path, &Path) -> io::Result<()>,
{
    let dir = target.parent().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("`{}` has no parent directory", target.display()),
        )
    })?;
    fs::create_dir_all(dir)?;

    let mut tmp = temp_sibling(target, dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    let tmp = tmp.into_temp_path();

    if let Err(err) = rename(&*tmp, target) {
        warn!(
            "event=atomic_write module=store status=fallback path={} error={}",
            target.display(),
            err
        );
        remove_if_present(target)?;
        rename(&*tmp, target)?;
    }
    // The temp path now names the target; disarm its cleanup.
    tmp.keep().map_err(|err| err.error)?;

    sync_dir(dir);
    Ok(())
}

fn temp_sibling(target: &Path, dir: &Path) -> io::Result<NamedTempFile> {
    let stem = target
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("record");
    Builder::new()
        .prefix(&format!(".{stem}."))
        .suffix(".tmp")
        .tempfile_in(dir)
}

fn remove_if_present(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err),
    }
}

#[cfg(unix)]
fn sync_dir(dir: &Path) {
    // Best effort: the rename is already visible even if the directory sync fails.
    if let Err(err) = fs::File::open(dir).and_then(|handle| handle.sync_all()) {
        warn!(
            "event=dir_sync module=store status=error path={} error={}",
            dir.display(),
            err
        );
    }
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) {}

#[cfg(test)]
mod tests {
    use super::{write_atomically, write_atomically_with};
    use std::cell::Cell;
    use std::fs;
    use std::io;
    use std::path::Path;
    use tempfile::TempDir;

    fn entry_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    fn refused() -> io::Error {
        io::Error::new(io::ErrorKind::PermissionDenied, "rename refused")
    }

    #[test]
    fn writes_new_file_and_leaves_no_temp_behind() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("Internal").join("a.xml");

        write_atomically(&target, b"first").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"first");
        assert_eq!(entry_names(target.parent().unwrap()), vec!["a.xml"]);
    }

    #[test]
    fn replaces_existing_content() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("a.xml");
        fs::write(&target, b"old content that is longer").unwrap();

        write_atomically(&target, b"new").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"new");
    }

    #[test]
    fn refused_rename_removes_old_target_and_moves_temp_into_place() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("a.xml");
        fs::write(&target, b"old").unwrap();
        // A second name for the old inode shows whether it was written through.
        let old_link = dir.path().join("old-link");
        fs::hard_link(&target, &old_link).unwrap();

        let calls = Cell::new(0);
        write_atomically_with(&target, b"new", |from, to| {
            calls.set(calls.get() + 1);
            if calls.get() == 1 {
                Err(refused())
            } else {
                fs::rename(from, to)
            }
        })
        .unwrap();

        assert_eq!(calls.get(), 2);
        assert_eq!(fs::read(&target).unwrap(), b"new");
        assert_eq!(fs::read(&old_link).unwrap(), b"old");
        assert_eq!(entry_names(dir.path()), vec!["a.xml", "old-link"]);
    }

    #[test]
    fn refused_rename_on_fresh_target_still_succeeds() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("b.xml");

        let calls = Cell::new(0);
        write_atomically_with(&target, b"fresh", |from, to| {
            calls.set(calls.get() + 1);
            if calls.get() == 1 {
                Err(refused())
            } else {
                fs::rename(from, to)
            }
        })
        .unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"fresh");
        assert_eq!(entry_names(dir.path()), vec!["b.xml"]);
    }

    #[test]
    fn failed_fallback_reports_error_and_cleans_up_temp() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("c.xml");

        let err = write_atomically_with(&target, b"lost", |_, _| Err(refused())).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
        assert!(entry_names(dir.path()).is_empty());
    }
}
