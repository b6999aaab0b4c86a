//! Filesystem operations: traversal, bucket placement, collision-safe naming and copying.

mod bucket;
mod copier;
mod duplicate;
mod helpers;
mod io_copy;
mod metadata;
mod stats;
mod traverse;

pub use bucket::{bucket_dir, ensure_bucket, extension_of};
pub use copier::{CopyOptions, copy_one};
pub use duplicate::{MAX_SUFFIX, candidate_name, next_free_destination};
pub use helpers::io_error_with_help;
pub use io_copy::{CopyResult, DurabilityMode, copy_exclusive};
pub use metadata::{PreserveMode, preserve};
pub use stats::{CopyStats, SortReport};
pub use traverse::traverse;
