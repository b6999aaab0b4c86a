//! Core configuration types.
//! - Config holds runtime settings with sensible defaults.
//! - LogLevel represents verbosity with simple parsing helpers.
//! - SymlinkPolicy decides what a copy unit does with a symlinked entry.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::fs_ops::{CopyOptions, PreserveMode};

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Per-file copy records and the summary (default)
    #[default]
    Normal,
    /// Adds bucket creation and naming details
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// How copy units treat entries that are symlinks. Directories reached through a
/// symlink are never recursed into under either policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SymlinkPolicy {
    /// Copy the content the link points at.
    #[default]
    Follow,
    /// Leave symlinks alone and count them as skipped.
    Skip,
}

impl FromStr for SymlinkPolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "follow" => Ok(SymlinkPolicy::Follow),
            "skip" => Ok(SymlinkPolicy::Skip),
            other => Err(format!("invalid symlink policy: '{other}' (expected follow or skip)")),
        }
    }
}

/// Runtime configuration for one sorting run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Tree to read files from
    pub source_dir: Option<PathBuf>,
    /// Root that receives the extension buckets
    pub target_dir: Option<PathBuf>,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
    /// Worker threads for the copy pool; 0 picks the number of CPUs
    pub workers: usize,
    /// Copy permissions and timestamps
    pub preserve_metadata: bool,
    /// Copy permission bits only (ignored when preserve_metadata is set)
    pub preserve_permissions: bool,
    pub symlinks: SymlinkPolicy,
    /// fsync every destination file before counting it as copied
    pub sync_writes: bool,
    /// Resolve destinations and log them, but do not touch the target
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: None,
            target_dir: None,
            log_level: LogLevel::Normal,
            log_file: None,
            workers: 0,
            preserve_metadata: false,
            preserve_permissions: true,
            symlinks: SymlinkPolicy::Follow,
            sync_writes: false,
            dry_run: false,
        }
    }
}

impl Config {
    /// Construct a Config with explicit roots; other fields use defaults.
    pub fn new(source_dir: impl Into<PathBuf>, target_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: Some(source_dir.into()),
            target_dir: Some(target_dir.into()),
            ..Default::default()
        }
    }

    /// Per-file behavior handed to every copy unit.
    pub fn copy_options(&self) -> CopyOptions {
        let preserve = if self.preserve_metadata {
            PreserveMode::Full
        } else if self.preserve_permissions {
            PreserveMode::Permissions
        } else {
            PreserveMode::None
        };
        CopyOptions {
            preserve,
            symlinks: self.symlinks,
            sync_writes: self.sync_writes,
            dry_run: self.dry_run,
        }
    }
}
