//! Top-level run: pre-flight validation, worker pool, traversal, report.

use anyhow::{Context, Result};
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::time::Instant;
use tracing::info;

use crate::config::Config;
use crate::fs_ops::{CopyStats, SortReport, traverse};
use crate::shutdown;

/// Build the pool that runs traversal and copy units. `workers == 0` lets rayon
/// pick one thread per CPU.
pub fn build_pool(workers: usize) -> Result<ThreadPool> {
    ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("ext-sorter-{i}"))
        .build()
        .context("build worker pool")
}

/// Validate `cfg`, then copy every file under the source into extension buckets
/// under the target.
///
/// Pre-flight failures are returned as errors before any work is scheduled.
/// Individual file and directory failures are only logged and counted in the report.
pub fn sort_tree(cfg: &Config) -> Result<SortReport> {
    let roots = cfg.validate()?;
    let pool = build_pool(cfg.workers)?;
    let opts = cfg.copy_options();
    let stats = CopyStats::default();

    info!(
        source = %roots.source.display(),
        target = %roots.target.display(),
        workers = pool.current_num_threads(),
        dry_run = opts.dry_run,
        "Starting sort"
    );

    let started = Instant::now();
    traverse(&pool, &roots.source, &roots.target, &opts, &stats);
    let report = stats.report(started.elapsed(), shutdown::is_requested());

    info!(
        copied = report.copied,
        failed = report.failed,
        skipped = report.skipped,
        dir_errors = report.dir_errors,
        interrupted = report.interrupted,
        "{}",
        report.summary()
    );
    Ok(report)
}
