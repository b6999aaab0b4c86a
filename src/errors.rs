//! Typed error definitions for ext_sorter.
//! Provides a small set of well-known failure modes for better logs and tests.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SortError {
    #[error("Source folder does not exist: {0}")]
    SourceNotFound(PathBuf),

    #[error("Source path is not a directory: {0}")]
    SourceNotDirectory(PathBuf),

    #[error("Target folder does not exist: {0}")]
    TargetNotFound(PathBuf),

    #[error("Target path is not a directory: {0}")]
    TargetNotDirectory(PathBuf),

    #[error("Source '{source_dir}' and target '{target_dir}' must not overlap")]
    OverlappingRoots {
        source_dir: PathBuf,
        target_dir: PathBuf,
    },

    #[error("Not a regular file: {0}")]
    NotRegularFile(PathBuf),

    #[error("No free destination name left for {name} in {bucket}")]
    NamesExhausted { bucket: PathBuf, name: String },

    #[error("Operation interrupted by user")]
    Interrupted,
}

impl SortError {
    /// Short stable code, emitted as a structured log field.
    pub fn code(&self) -> &'static str {
        match self {
            SortError::SourceNotFound(_) => "source_not_found",
            SortError::SourceNotDirectory(_) => "source_not_directory",
            SortError::TargetNotFound(_) => "target_not_found",
            SortError::TargetNotDirectory(_) => "target_not_directory",
            SortError::OverlappingRoots { .. } => "overlapping_roots",
            SortError::NotRegularFile(_) => "not_regular_file",
            SortError::NamesExhausted { .. } => "names_exhausted",
            SortError::Interrupted => "interrupted",
        }
    }
}
