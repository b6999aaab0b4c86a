//! Counters shared by every traversal and copy unit of one run.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Live counters. Units only ever add; totals are read after the traversal joins.
#[derive(Debug, Default)]
pub struct CopyStats {
    copied: AtomicU64,
    failed: AtomicU64,
    skipped: AtomicU64,
    dir_errors: AtomicU64,
}

impl CopyStats {
    pub fn record_copied(&self) {
        self.copied.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dir_error(&self) {
        self.dir_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn copied(&self) -> u64 {
        self.copied.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    pub fn skipped(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }

    pub fn dir_errors(&self) -> u64 {
        self.dir_errors.load(Ordering::Relaxed)
    }

    /// Freeze the counters into a report.
    pub fn report(&self, elapsed: Duration, interrupted: bool) -> SortReport {
        SortReport {
            copied: self.copied(),
            failed: self.failed(),
            skipped: self.skipped(),
            dir_errors: self.dir_errors(),
            elapsed,
            interrupted,
        }
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortReport {
    /// Files copied (or planned, in dry-run mode)
    pub copied: u64,
    /// Copy units that ended in an error
    pub failed: u64,
    /// Entries left alone by symlink policy or shutdown
    pub skipped: u64,
    /// Directories or entries that could not be listed
    pub dir_errors: u64,
    pub elapsed: Duration,
    pub interrupted: bool,
}

impl SortReport {
    /// One-line summary printed at the end of a run.
    pub fn summary(&self) -> String {
        format!(
            "Copied {} files in {:.2} seconds",
            self.copied,
            self.elapsed.as_secs_f64()
        )
    }
}
