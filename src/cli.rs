//! CLI definition and parsing.
//!
//! Notes:
//! - SOURCE and TARGET are optional here; missing ones come from the config file
//!   or are prompted for on stdin.
//! - --debug is a shorthand for --log-level debug.

use clap::{Parser, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, LogLevel, SymlinkPolicy};

/// Copy every file of a tree into one folder per extension, never overwriting.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Concurrently copy a directory tree into per-extension folders"
)]
pub struct Args {
    /// Folder to read files from (recursively).
    #[arg(value_name = "SOURCE", value_hint = ValueHint::DirPath)]
    pub source: Option<PathBuf>,

    /// Existing folder that receives one subfolder per extension.
    #[arg(value_name = "TARGET", value_hint = ValueHint::DirPath)]
    pub target: Option<PathBuf>,

    /// Worker threads for copying (0 = number of CPUs).
    #[arg(short = 'j', long, value_name = "N")]
    pub workers: Option<usize>,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(short = 'd', long)]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Also append logs to this file.
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Emit logs in structured JSON.
    #[arg(long)]
    pub json: bool,

    /// Show where each file would go, but do not create anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Preserve permissions and timestamps of copied files.
    #[arg(long)]
    pub preserve_metadata: bool,

    /// Do not copy permission bits (they are copied by default).
    #[arg(long)]
    pub no_preserve_permissions: bool,

    /// Skip symlinks instead of copying the files they point to.
    #[arg(long)]
    pub skip_symlinks: bool,

    /// fsync every copied file before counting it.
    #[arg(long)]
    pub sync: bool,

    /// Print the config file location used by ext_sorter and exit.
    #[arg(long)]
    pub print_config: bool,

    /// Write a template config file at the config location and exit.
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(p) = &self.source {
            cfg.source_dir = Some(sanitize_path(&p.to_string_lossy()));
        }
        if let Some(p) = &self.target {
            cfg.target_dir = Some(sanitize_path(&p.to_string_lossy()));
        }
        if let Some(n) = self.workers {
            cfg.workers = n;
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(p) = &self.log_file {
            cfg.log_file = Some(p.clone());
        }
        if self.dry_run {
            cfg.dry_run = true;
        }
        if self.preserve_metadata {
            cfg.preserve_metadata = true;
        }
        if self.no_preserve_permissions {
            cfg.preserve_permissions = false;
        }
        if self.skip_symlinks {
            cfg.symlinks = SymlinkPolicy::Skip;
        }
        if self.sync {
            cfg.sync_writes = true;
        }
    }
}

/// Turn a user-typed path into a PathBuf, dropping whitespace and stray quotes
/// left by shells or copy-paste, plus one trailing separator.
pub fn sanitize_path(s: &str) -> PathBuf {
    let trimmed = s.trim();
    let mut inner: String = trimmed
        .trim_matches(|c| c == '\'' || c == '"')
        .chars()
        .filter(|c| *c != '\'' && *c != '"')
        .collect();

    if inner.len() > 1 && (inner.ends_with('/') || inner.ends_with('\\')) {
        inner.pop();
    }
    PathBuf::from(inner)
}

pub fn parse() -> Args {
    Args::parse()
}
