//! I/O error helpers.
//!
//! Adapter that enriches an io::Error with the operation, the path and a short
//! platform-aware hint, for use with `map_err`:
//!
//!   fs::create_dir_all(dir).map_err(io_error_with_help("create bucket", dir))?;

use anyhow::anyhow;
use std::io;
use std::path::Path;

fn hint_for(e: &io::Error) -> Option<&'static str> {
    #[cfg(unix)]
    {
        let hint = match e.raw_os_error().unwrap_or_default() {
            libc::EACCES | libc::EPERM => Some("permission denied; check ownership and write permissions"),
            libc::ENOENT => Some("path not found; it may have been removed during the run"),
            libc::EEXIST => Some("already exists"),
            libc::ENOSPC => Some("no space left on target device"),
            libc::EROFS => Some("read-only filesystem"),
            libc::ENOTDIR => Some("a path component is a file, not a directory"),
            libc::ELOOP => Some("too many levels of symbolic links"),
            libc::ENAMETOOLONG => Some("file name or path too long"),
            libc::EMFILE | libc::ENFILE => Some("too many open files; lower --workers or raise the limit"),
            _ => None,
        };
        if hint.is_some() {
            return hint;
        }
    }
    match e.kind() {
        io::ErrorKind::PermissionDenied => Some("permission denied; check ownership and write permissions"),
        io::ErrorKind::NotFound => Some("path not found; it may have been removed during the run"),
        io::ErrorKind::AlreadyExists => Some("already exists"),
        _ => None,
    }
}

fn build_message(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);
    if let Some(hint) = hint_for(e) {
        msg.push_str(" (");
        msg.push_str(hint);
        msg.push(')');
    }
    if let Some(code) = e.raw_os_error() {
        msg.push_str(&format!(" [os code: {code}]"));
    }
    msg
}

/// Adapter for anyhow::Result code.
pub fn io_error_with_help<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> anyhow::Error + 'a {
    move |e: io::Error| anyhow!(build_message(op, path, &e))
}
