//! Pre-flight validation.
//! Verifies both roots exist, are directories, are readable/writable and do not
//! overlap. Nothing under the target is created here apart from a short-lived probe file.

use anyhow::{Context, Result, anyhow};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::errors::SortError;

use super::types::Config;

/// Canonical roots of a validated run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roots {
    pub source: PathBuf,
    pub target: PathBuf,
}

impl Config {
    /// Validate both roots and return their canonical forms.
    ///
    /// Errors are `SortError` values wrapped in anyhow so callers can downcast
    /// and report a stable code.
    pub fn validate(&self) -> Result<Roots> {
        let source = self
            .source_dir
            .as_deref()
            .ok_or_else(|| anyhow!("no source folder given"))?;
        let target = self
            .target_dir
            .as_deref()
            .ok_or_else(|| anyhow!("no target folder given"))?;

        // 1) Source: exists, directory, readable.
        if !source.exists() {
            error!(path = %source.display(), "Source folder does not exist");
            return Err(SortError::SourceNotFound(source.to_path_buf()).into());
        }
        if !source.is_dir() {
            error!(path = %source.display(), "Source path is not a directory");
            return Err(SortError::SourceNotDirectory(source.to_path_buf()).into());
        }
        fs::read_dir(source).with_context(|| {
            format!("Cannot read source folder '{}'; check permissions", source.display())
        })?;
        debug!("source readable: {}", source.display());

        // 2) Target: exists, directory, writable. It is never created here.
        if !target.exists() {
            error!(path = %target.display(), "Target folder does not exist");
            return Err(SortError::TargetNotFound(target.to_path_buf()).into());
        }
        if !target.is_dir() {
            error!(path = %target.display(), "Target path is not a directory");
            return Err(SortError::TargetNotDirectory(target.to_path_buf()).into());
        }
        writable_probe(target).with_context(|| {
            format!("Cannot write to target folder '{}'; check permissions", target.display())
        })?;
        debug!("target writable: {}", target.display());

        // 3) Disjoint roots: copies landing inside the source would be picked up again.
        let source_real = fs::canonicalize(source)
            .with_context(|| format!("resolve source folder '{}'", source.display()))?;
        let target_real = fs::canonicalize(target)
            .with_context(|| format!("resolve target folder '{}'", target.display()))?;
        if source_real.starts_with(&target_real) || target_real.starts_with(&source_real) {
            error!(
                source = %source_real.display(),
                target = %target_real.display(),
                "Source and target overlap"
            );
            return Err(SortError::OverlappingRoots {
                source_dir: source_real,
                target_dir: target_real,
            }
            .into());
        }

        info!(
            source = %source_real.display(),
            target = %target_real.display(),
            "Paths validated"
        );
        Ok(Roots {
            source: source_real,
            target: target_real,
        })
    }
}

/// Create and remove a uniquely named file inside `dir`.
fn writable_probe(dir: &Path) -> io::Result<()> {
    let probe = dir.join(format!(".ext_sorter_probe_{}.tmp", std::process::id()));
    fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&probe)?;
    fs::remove_file(&probe)
}
