//! Collision-avoidance naming.
//!
//! Candidates for `name.ext` inside a bucket are tried in order:
//! `name.ext`, `name_1.ext`, `name_2.ext`, ... The first one with no filesystem
//! entry (file, directory or dangling symlink) wins.
//!
//! Examples:
//! - "report.pdf"     -> "report_1.pdf", "report_2.pdf", ...
//! - "readme"         -> "readme_1"
//! - ".env"           -> ".env_1"
//! - "archive.tar.gz" -> "archive.tar_1.gz"
//!
//! This only inspects the current filesystem state. The copier claims the chosen
//! name with an exclusive create and resumes the scan after a lost race.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::trace;

use crate::errors::SortError;

/// Highest suffix tried before giving up on a name.
pub const MAX_SUFFIX: u32 = 100_000;

#[cfg(windows)]
const MAX_FILENAME_LEN: usize = 240; // leave headroom for legacy MAX_PATH
#[cfg(not(windows))]
const MAX_FILENAME_LEN: usize = 255; // typical POSIX/EXT limits

/// File name of candidate number `n` for `name`; `n == 0` is the name itself.
pub fn candidate_name(name: &OsStr, n: u32) -> OsString {
    if n == 0 {
        return name.to_os_string();
    }
    let base = Path::new(name);
    let stem = base
        .file_stem()
        .map(OsStr::to_os_string)
        .unwrap_or_else(|| name.to_os_string());
    let ext = base.extension();
    build_name_with_suffix(&stem, ext, &format!("_{n}"))
}

/// First free destination for `name` in `bucket`, scanning from candidate `start`.
/// Returns the path and the candidate number it corresponds to.
pub fn next_free_destination(
    bucket: &Path,
    name: &OsStr,
    start: u32,
) -> Result<(PathBuf, u32), SortError> {
    for n in start..=MAX_SUFFIX {
        let candidate = bucket.join(candidate_name(name, n));
        // symlink_metadata so a dangling link still counts as taken
        if fs::symlink_metadata(&candidate).is_err() {
            if n > 0 {
                trace!(name = ?name, n, bucket = %bucket.display(), "renamed to avoid collision");
            }
            return Ok((candidate, n));
        }
    }
    Err(SortError::NamesExhausted {
        bucket: bucket.to_path_buf(),
        name: name.to_string_lossy().into_owned(),
    })
}

/// Measure the approximate length of an OsStr for filename budgeting.
#[cfg(unix)]
fn name_len_units(s: &OsStr) -> usize {
    use std::os::unix::ffi::OsStrExt;
    s.as_bytes().len()
}

#[cfg(not(unix))]
fn name_len_units(s: &OsStr) -> usize {
    s.to_string_lossy().len()
}

/// Join `stem + suffix + ["." + ext]`, shortening the stem when the result would
/// exceed MAX_FILENAME_LEN. The suffix and extension are never cut.
fn build_name_with_suffix(stem: &OsStr, ext: Option<&OsStr>, suffix: &str) -> OsString {
    let mut overhead = suffix.len();
    let mut ext_part = OsString::new();
    if let Some(e) = ext {
        overhead += 1 + name_len_units(e);
        ext_part.push(".");
        ext_part.push(e);
    }

    let budget = MAX_FILENAME_LEN.saturating_sub(overhead).max(1);
    let stem_os = if name_len_units(stem) > budget {
        truncate_stem(stem, budget)
    } else {
        stem.to_os_string()
    };

    let mut new_name = stem_os;
    new_name.push(suffix);
    new_name.push(&ext_part);
    new_name
}

fn truncate_stem(stem: &OsStr, budget: usize) -> OsString {
    if let Some(s) = stem.to_str() {
        let mut end = 0;
        for (idx, ch) in s.char_indices() {
            if idx + ch.len_utf8() > budget {
                break;
            }
            end = idx + ch.len_utf8();
        }
        if end == 0 {
            return OsString::from("f");
        }
        return OsString::from(&s[..end]);
    }
    #[cfg(unix)]
    {
        use std::os::unix::ffi::{OsStrExt, OsStringExt};
        let bytes = stem.as_bytes();
        OsString::from_vec(bytes[..bytes.len().min(budget)].to_vec())
    }
    #[cfg(not(unix))]
    {
        truncate_stem(OsStr::new(&stem.to_string_lossy().into_owned()), budget)
    }
}
