//! Core library for `ext_sorter`.
//!
//! Walks a source tree concurrently and copies every file into
//! `<target>/<extension>/`, renaming to `<stem>_<n>.<ext>` instead of overwriting.
//! The binary adds argument parsing, interactive prompts and logging setup on top
//! of [`sort_tree`].

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod platform;
pub mod shutdown;
pub mod sorter;

pub use config::{
    Config, LogLevel, Roots, SymlinkPolicy, default_config_path, default_log_path,
    path_has_symlink_ancestor,
};
pub use errors::SortError;
pub use fs_ops::{CopyOptions, CopyStats, SortReport, copy_one, traverse};
pub use sorter::{build_pool, sort_tree};
