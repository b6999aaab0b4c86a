//! Extension buckets.
//!
//! A bucket is the subdirectory of the target root named after a file's
//! extension (the text after the final `.`, case preserved). Files without an
//! extension, including dotfiles such as `.env`, use the empty bucket name, which
//! resolves to the target root itself.

use anyhow::Result;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::trace;

use super::helpers::io_error_with_help;

/// Extension of `file` without the leading dot; empty when there is none.
pub fn extension_of(file: &Path) -> OsString {
    file.extension()
        .map(OsStr::to_os_string)
        .unwrap_or_default()
}

/// Bucket directory for `file` under `target_root`.
pub fn bucket_dir(target_root: &Path, file: &Path) -> PathBuf {
    let ext = extension_of(file);
    if ext.is_empty() {
        target_root.to_path_buf()
    } else {
        target_root.join(ext)
    }
}

/// Create the bucket (and parents) if missing. Concurrent creation of the same
/// bucket by sibling units is not an error.
pub fn ensure_bucket(bucket: &Path) -> Result<()> {
    fs::create_dir_all(bucket).map_err(io_error_with_help("create bucket", bucket))?;
    trace!(bucket = %bucket.display(), "bucket ready");
    Ok(())
}
