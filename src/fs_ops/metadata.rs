//! Best-effort metadata preservation for copied files.
//! Failures are logged at warn level and never fail the copy.

use filetime::{FileTime, set_file_times};
use std::fs;
use std::path::Path;
use tracing::{trace, warn};

/// What to carry over from source to destination after the bytes are copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreserveMode {
    None,
    /// Mode bits on Unix, readonly attribute elsewhere.
    #[default]
    Permissions,
    /// Permissions plus access/modification times.
    Full,
}

/// Apply `mode` to `dest` using already-fetched `src_meta`.
pub fn preserve(dest: &Path, src_meta: &fs::Metadata, mode: PreserveMode) {
    match mode {
        PreserveMode::None => {}
        PreserveMode::Permissions => preserve_permissions(dest, src_meta),
        PreserveMode::Full => {
            // times first: a readonly mode could block the utimes call on some platforms
            preserve_times(dest, src_meta);
            preserve_permissions(dest, src_meta);
        }
    }
}

fn preserve_times(dest: &Path, src_meta: &fs::Metadata) {
    let at = FileTime::from_last_access_time(src_meta);
    let mt = FileTime::from_last_modification_time(src_meta);
    match set_file_times(dest, at, mt) {
        Ok(()) => trace!(path = %dest.display(), "set atime/mtime on destination"),
        Err(e) => {
            warn!(path = %dest.display(), error = %e, "failed to set atime/mtime on destination")
        }
    }
}

fn preserve_permissions(dest: &Path, src_meta: &fs::Metadata) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let src_mode = src_meta.permissions().mode() & 0o777;
        match fs::set_permissions(dest, fs::Permissions::from_mode(src_mode)) {
            Ok(()) => trace!(path = %dest.display(), mode = format!("{:o}", src_mode), "set permissions on destination"),
            Err(e) => warn!(path = %dest.display(), mode = format!("{:o}", src_mode), error = %e, "failed to set permissions on destination"),
        }
    }
    #[cfg(not(unix))]
    {
        let ro = src_meta.permissions().readonly();
        let result = fs::metadata(dest).and_then(|meta| {
            let mut perms = meta.permissions();
            perms.set_readonly(ro);
            fs::set_permissions(dest, perms)
        });
        if let Err(e) = result {
            warn!(path = %dest.display(), readonly = ro, error = %e, "failed to set readonly attribute on destination");
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::tempdir;

    #[test]
    fn permissions_mode_copies_mode_bits() {
        let td = tempdir().unwrap();
        let src = td.path().join("src.sh");
        let dst = td.path().join("dst.sh");
        fs::write(&src, b"#!/bin/sh\n").unwrap();
        fs::write(&dst, b"#!/bin/sh\n").unwrap();
        fs::set_permissions(&src, fs::Permissions::from_mode(0o751)).unwrap();

        preserve(&dst, &fs::metadata(&src).unwrap(), PreserveMode::Permissions);
        assert_eq!(fs::metadata(&dst).unwrap().permissions().mode() & 0o777, 0o751);
    }

    #[test]
    fn full_mode_copies_mtime() {
        let td = tempdir().unwrap();
        let src = td.path().join("src");
        let dst = td.path().join("dst");
        fs::write(&src, b"a").unwrap();
        fs::write(&dst, b"a").unwrap();
        let old = FileTime::from_unix_time(1_000_000_000, 0);
        filetime::set_file_mtime(&src, old).unwrap();

        preserve(&dst, &fs::metadata(&src).unwrap(), PreserveMode::Full);
        let got = FileTime::from_last_modification_time(&fs::metadata(&dst).unwrap());
        assert_eq!(got, old);
    }

    #[test]
    fn none_mode_leaves_destination_alone() {
        let td = tempdir().unwrap();
        let src = td.path().join("src");
        let dst = td.path().join("dst");
        fs::write(&src, b"a").unwrap();
        fs::write(&dst, b"a").unwrap();
        fs::set_permissions(&src, fs::Permissions::from_mode(0o700)).unwrap();
        fs::set_permissions(&dst, fs::Permissions::from_mode(0o644)).unwrap();

        preserve(&dst, &fs::metadata(&src).unwrap(), PreserveMode::None);
        assert_eq!(fs::metadata(&dst).unwrap().permissions().mode() & 0o777, 0o644);
    }
}
