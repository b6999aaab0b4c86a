//! Platform-specific helpers.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

/// Open (or create) a log file for appending. New files get mode 0600 on Unix;
/// existing files keep their permissions.
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    let mut opts = OpenOptions::new();
    opts.create(true).append(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o600);
    }
    opts.open(path)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::tempdir;

    #[test]
    fn new_log_file_gets_0600() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("new.log");
        let _f = open_log_file_secure_append(&path).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }

    #[test]
    fn existing_log_is_appended_not_truncated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("old.log");
        fs::write(&path, "first\n").unwrap();
        let mut f = open_log_file_secure_append(&path).unwrap();
        f.write_all(b"second\n").unwrap();
        drop(f);
        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }
}
