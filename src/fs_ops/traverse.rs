//! Recursive concurrent traversal.
//!
//! Every directory becomes a traversal unit and every other entry a copy unit,
//! both spawned into one `rayon` scope. The scope does not return until all units,
//! at every depth, have finished, which gives the recursive join. The pool passed
//! in bounds how many units run (and how many files are open) at once.

use rayon::{Scope, ThreadPool};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

use crate::config::SymlinkPolicy;
use crate::shutdown;

use super::copier::{CopyOptions, copy_one};
use super::stats::CopyStats;

/// Borrowed state shared by all units of one traversal.
struct Unit<'a> {
    target_root: &'a Path,
    opts: &'a CopyOptions,
    stats: &'a CopyStats,
}

/// Copy every file under `source_dir` into buckets under `target_root`.
///
/// Returns once the whole subtree has been recursed into or copied. Listing
/// errors are logged and counted per directory; they never stop other branches.
pub fn traverse(
    pool: &ThreadPool,
    source_dir: &Path,
    target_root: &Path,
    opts: &CopyOptions,
    stats: &CopyStats,
) {
    let unit = Unit {
        target_root,
        opts,
        stats,
    };
    let root = source_dir.to_path_buf();
    pool.scope(|s| walk_dir(s, &unit, root));
}

fn walk_dir<'scope>(scope: &Scope<'scope>, unit: &'scope Unit<'scope>, dir: PathBuf) {
    if shutdown::is_requested() {
        debug!(dir = %dir.display(), "shutdown requested; not listing directory");
        return;
    }

    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) => {
            unit.stats.record_dir_error();
            warn!(dir = %dir.display(), error = %e, "Failed to list directory; skipping subtree");
            return;
        }
    };
    trace!(dir = %dir.display(), "listing directory");

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                unit.stats.record_dir_error();
                warn!(dir = %dir.display(), error = %e, "Failed to read directory entry");
                continue;
            }
        };
        let path = entry.path();
        let file_type = match entry.file_type() {
            Ok(ft) => ft,
            Err(e) => {
                unit.stats.record_dir_error();
                warn!(path = %path.display(), error = %e, "Failed to read entry type");
                continue;
            }
        };

        if file_type.is_dir() {
            scope.spawn(move |s| walk_dir(s, unit, path));
        } else if file_type.is_symlink() && unit.opts.symlinks == SymlinkPolicy::Skip {
            unit.stats.record_skipped();
            debug!(path = %path.display(), "skipping symlink");
        } else {
            scope.spawn(move |_| copy_unit(unit, &path));
        }
    }
}

fn copy_unit(unit: &Unit<'_>, path: &Path) {
    if shutdown::is_requested() {
        unit.stats.record_skipped();
        return;
    }
    // Outcome is already logged and counted by copy_one.
    let _ = copy_one(path, unit.target_root, unit.opts, unit.stats);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::ThreadPoolBuilder;
    use tempfile::tempdir;

    #[test]
    fn copies_nested_tree_and_joins() {
        let td = tempdir().unwrap();
        let src = td.path().join("src");
        let dst = td.path().join("dst");
        fs::create_dir_all(src.join("a").join("b").join("c")).unwrap();
        fs::create_dir(&dst).unwrap();
        fs::write(src.join("top.txt"), b"1").unwrap();
        fs::write(src.join("a").join("mid.rs"), b"2").unwrap();
        fs::write(src.join("a").join("b").join("c").join("deep.txt"), b"3").unwrap();

        let pool = ThreadPoolBuilder::new().num_threads(2).build().unwrap();
        let stats = CopyStats::default();
        traverse(&pool, &src, &dst, &CopyOptions::default(), &stats);

        // traverse has returned, so every unit must already be done
        assert_eq!(stats.copied(), 3);
        assert!(dst.join("txt").join("top.txt").is_file());
        assert!(dst.join("txt").join("deep.txt").is_file());
        assert!(dst.join("rs").join("mid.rs").is_file());
    }

    #[test]
    fn unreadable_root_is_a_dir_error_not_a_panic() {
        let td = tempdir().unwrap();
        let pool = ThreadPoolBuilder::new().num_threads(1).build().unwrap();
        let stats = CopyStats::default();
        traverse(
            &pool,
            &td.path().join("missing"),
            td.path(),
            &CopyOptions::default(),
            &stats,
        );
        assert_eq!(stats.dir_errors(), 1);
        assert_eq!(stats.copied(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn skip_policy_ignores_symlinks() {
        let td = tempdir().unwrap();
        let src = td.path().join("src");
        let dst = td.path().join("dst");
        fs::create_dir(&src).unwrap();
        fs::create_dir(&dst).unwrap();
        fs::write(td.path().join("real.txt"), b"r").unwrap();
        std::os::unix::fs::symlink(td.path().join("real.txt"), src.join("link.txt")).unwrap();
        fs::write(src.join("plain.txt"), b"p").unwrap();

        let pool = ThreadPoolBuilder::new().num_threads(2).build().unwrap();
        let stats = CopyStats::default();
        let opts = CopyOptions {
            symlinks: SymlinkPolicy::Skip,
            ..CopyOptions::default()
        };
        traverse(&pool, &src, &dst, &opts, &stats);

        assert_eq!(stats.copied(), 1);
        assert_eq!(stats.skipped(), 1);
        assert!(!dst.join("txt").join("link.txt").exists());
    }
}
