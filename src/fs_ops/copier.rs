//! Copy unit: one source file into its extension bucket.
//!
//! Steps: resolve the bucket from the extension, create it if missing, pick the
//! first free `<stem>[_<n>]<.ext>` name, claim it with an exclusive create, copy
//! the bytes, then apply the configured metadata preservation.
//!
//! A claim that loses a race against a concurrent unit (same name, same bucket)
//! resumes the name scan after the lost candidate, so no existing file is ever
//! overwritten. The failure of one file is logged and counted; it never reaches
//! the caller's siblings.

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::config::SymlinkPolicy;
use crate::errors::SortError;

use super::bucket::{bucket_dir, ensure_bucket};
use super::duplicate::next_free_destination;
use super::helpers::io_error_with_help;
use super::io_copy::{DurabilityMode, copy_exclusive};
use super::metadata::{PreserveMode, preserve};
use super::stats::CopyStats;

/// Per-file behavior shared by all copy units of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyOptions {
    pub preserve: PreserveMode,
    pub symlinks: SymlinkPolicy,
    pub sync_writes: bool,
    pub dry_run: bool,
}

/// Copy `src` into its bucket under `target_root`, updating `stats`.
///
/// Returns the destination on success. Success and failure are both recorded as
/// log events here; callers may ignore the result.
pub fn copy_one(
    src: &Path,
    target_root: &Path,
    opts: &CopyOptions,
    stats: &CopyStats,
) -> Result<PathBuf> {
    let bucket = bucket_dir(target_root, src);
    let mut attempted = bucket.clone();

    match place_file(src, &bucket, opts, &mut attempted) {
        Ok(dest) => {
            stats.record_copied();
            if opts.dry_run {
                info!(src = %src.display(), dest = %dest.display(), "dry-run: would copy file");
            } else {
                info!(src = %src.display(), dest = %dest.display(), "Copied file");
            }
            Ok(dest)
        }
        Err(e) => {
            stats.record_failed();
            let code = e
                .downcast_ref::<SortError>()
                .map(SortError::code)
                .unwrap_or("io");
            error!(
                code,
                src = %src.display(),
                dest = %attempted.display(),
                error = %format!("{e:#}"),
                "Failed to copy file"
            );
            Err(e)
        }
    }
}

/// Steps 2-4 of a copy. `attempted` tracks the destination being worked on so a
/// failure can be reported against it.
fn place_file(
    src: &Path,
    bucket: &Path,
    opts: &CopyOptions,
    attempted: &mut PathBuf,
) -> Result<PathBuf> {
    let file_name = src
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("source has no file name: {}", src.display()))?;
    *attempted = bucket.join(file_name);

    // Follows symlinks: a FIFO, device or linked directory is refused before any open().
    let src_meta = fs::metadata(src).map_err(io_error_with_help("stat source file", src))?;
    if !src_meta.is_file() {
        return Err(SortError::NotRegularFile(src.to_path_buf()).into());
    }

    if opts.dry_run {
        let (dest, _) = next_free_destination(bucket, file_name, 0)?;
        *attempted = dest.clone();
        return Ok(dest);
    }

    ensure_bucket(bucket)?;

    let durability = if opts.sync_writes {
        DurabilityMode::Full
    } else {
        DurabilityMode::Data
    };

    let mut start = 0;
    loop {
        let (dest, n) = next_free_destination(bucket, file_name, start)?;
        *attempted = dest.clone();
        match copy_exclusive(src, &dest, durability) {
            Ok(res) => {
                debug!(dest = %dest.display(), bytes = res.bytes, "bytes copied");
                preserve(&dest, &src_meta, opts.preserve);
                return Ok(dest);
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                debug!(dest = %dest.display(), "destination claimed concurrently; trying next name");
                start = n.saturating_add(1);
            }
            Err(e) => {
                return Err(io_error_with_help("copy file", &dest)(e))
                    .with_context(|| format!("copy '{}'", src.display()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn opts() -> CopyOptions {
        CopyOptions::default()
    }

    #[test]
    fn copies_into_extension_bucket() {
        let td = tempdir().unwrap();
        let src = td.path().join("notes.md");
        let target = td.path().join("out");
        fs::create_dir(&target).unwrap();
        fs::write(&src, b"# hi").unwrap();
        let stats = CopyStats::default();

        let dest = copy_one(&src, &target, &opts(), &stats).unwrap();
        assert_eq!(dest, target.join("md").join("notes.md"));
        assert_eq!(fs::read(&dest).unwrap(), b"# hi");
        assert_eq!(stats.copied(), 1);
    }

    #[test]
    fn second_copy_gets_suffix() {
        let td = tempdir().unwrap();
        let src = td.path().join("a.txt");
        let target = td.path().join("out");
        fs::create_dir(&target).unwrap();
        fs::write(&src, b"a").unwrap();
        let stats = CopyStats::default();

        copy_one(&src, &target, &opts(), &stats).unwrap();
        let second = copy_one(&src, &target, &opts(), &stats).unwrap();
        let third = copy_one(&src, &target, &opts(), &stats).unwrap();
        assert_eq!(second, target.join("txt").join("a_1.txt"));
        assert_eq!(third, target.join("txt").join("a_2.txt"));
        assert_eq!(stats.copied(), 3);
    }

    #[test]
    fn missing_source_is_counted_as_failure() {
        let td = tempdir().unwrap();
        let stats = CopyStats::default();
        let res = copy_one(&td.path().join("ghost.txt"), td.path(), &opts(), &stats);
        assert!(res.is_err());
        assert_eq!(stats.copied(), 0);
        assert_eq!(stats.failed(), 1);
        assert!(!td.path().join("txt").exists(), "no bucket for a failed stat");
    }

    #[test]
    fn dry_run_creates_nothing() {
        let td = tempdir().unwrap();
        let src = td.path().join("photo.jpg");
        let target = td.path().join("out");
        fs::create_dir(&target).unwrap();
        fs::write(&src, b"jpg").unwrap();
        let stats = CopyStats::default();
        let o = CopyOptions {
            dry_run: true,
            ..opts()
        };

        let dest = copy_one(&src, &target, &o, &stats).unwrap();
        assert_eq!(dest, target.join("jpg").join("photo.jpg"));
        assert!(!target.join("jpg").exists());
        assert_eq!(stats.copied(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn fifo_is_refused_without_blocking() {
        use std::ffi::CString;
        use std::os::unix::ffi::OsStrExt;

        let td = tempdir().unwrap();
        let fifo = td.path().join("pipe.dat");
        let c = CString::new(fifo.as_os_str().as_bytes()).unwrap();
        assert_eq!(unsafe { libc::mkfifo(c.as_ptr(), 0o644) }, 0);
        let target = td.path().join("out");
        fs::create_dir(&target).unwrap();
        let stats = CopyStats::default();

        let err = copy_one(&fifo, &target, &opts(), &stats).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SortError>(),
            Some(SortError::NotRegularFile(_))
        ));
        assert_eq!(stats.failed(), 1);
    }
}
