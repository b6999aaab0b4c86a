//! Exclusive streaming copy.
//!
//! - The destination is created with `create_new` (O_EXCL): an existing entry is
//!   never clobbered, and losing a race surfaces as `ErrorKind::AlreadyExists`.
//! - On Linux the bytes move in-kernel via `copy_file_range` when supported;
//!   otherwise buffered I/O with 1 MiB buffers is used.
//! - A destination created by this call is removed again if the copy fails.
//!
//! Snapshot semantics: the source is read once from start to EOF; bytes appended
//! concurrently may or may not be included.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

const BUF_SIZE: usize = 1024 * 1024;

/// Durability mode controlling post-write flush behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DurabilityMode {
    /// Data handed to the OS page cache; fastest.
    Data,
    /// `sync_all` on the destination before returning.
    Full,
}

/// Result of a streaming copy.
#[derive(Debug, Clone, Copy)]
pub struct CopyResult {
    pub bytes: u64,
    pub mode: DurabilityMode,
}

/// Copy `src` into a newly created `dst`.
pub fn copy_exclusive(src: &Path, dst: &Path, mode: DurabilityMode) -> io::Result<CopyResult> {
    let src_f = File::open(src)?;
    let dst_f = OpenOptions::new().write(true).create_new(true).open(dst)?;

    match fill(src_f, dst_f, mode) {
        Ok(bytes) => Ok(CopyResult { bytes, mode }),
        Err(e) => {
            // Only reached after we created dst ourselves, so removing it is safe.
            let _ = fs::remove_file(dst);
            Err(e)
        }
    }
}

fn fill(src_f: File, dst_f: File, mode: DurabilityMode) -> io::Result<u64> {
    #[cfg(target_os = "linux")]
    if let Some(bytes) = copy_in_kernel(&src_f, &dst_f)? {
        if mode == DurabilityMode::Full {
            dst_f.sync_all()?;
        }
        return Ok(bytes);
    }

    let mut reader = BufReader::with_capacity(BUF_SIZE, src_f);
    let mut writer = BufWriter::with_capacity(BUF_SIZE, dst_f);
    let bytes = io::copy(&mut reader, &mut writer)?;
    writer.flush()?;
    if mode == DurabilityMode::Full {
        writer.get_ref().sync_all()?;
    }
    Ok(bytes)
}

/// `copy_file_range` loop. Ok(None) means the kernel refused before any byte moved
/// and the caller should fall back to streaming.
#[cfg(target_os = "linux")]
fn copy_in_kernel(src_f: &File, dst_f: &File) -> io::Result<Option<u64>> {
    use std::os::unix::io::AsRawFd;

    const CHUNK: usize = 16 * 1024 * 1024;
    let mut total: u64 = 0;
    loop {
        // SAFETY: both descriptors are open for the duration of the call and
        // null offsets make the kernel use and advance the file positions.
        let rc = unsafe {
            libc::copy_file_range(
                src_f.as_raw_fd(),
                std::ptr::null_mut(),
                dst_f.as_raw_fd(),
                std::ptr::null_mut(),
                CHUNK,
                0,
            )
        };
        if rc > 0 {
            total += rc as u64;
            continue;
        }
        if rc == 0 {
            return Ok(Some(total));
        }
        let err = io::Error::last_os_error();
        if err.kind() == io::ErrorKind::Interrupted {
            continue;
        }
        let unsupported = matches!(
            err.raw_os_error(),
            Some(libc::EXDEV | libc::ENOSYS | libc::EINVAL | libc::EPERM | libc::EOPNOTSUPP)
        );
        if total == 0 && unsupported {
            return Ok(None);
        }
        return Err(err);
    }
}
