//! Exclusive directory lock.
//!
//! The lock file `<dir>/.lock` holds the owner's process id once the lock
//! is taken, so a refused open can name the process in its error. The OS
//! lock is released when the `FileLock` (and its file handle) is dropped;
//! a stale pid left in the file is harmless.

use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

const LOCK_FILE: &str = ".lock";

/// Exclusive lock on a profile directory.
#[derive(Debug)]
pub struct FileLock {
    _file: File,
    path: PathBuf,
}

impl FileLock {
    /// Take the lock on `dir`, failing fast if another handle holds it.
    ///
    /// # Errors
    /// - `ErrorKind::WouldBlock` if the directory is already locked
    /// - `ErrorKind::Unsupported` on platforms without advisory locks
    /// - any I/O error opening or writing the lock file
    pub fn acquire(dir: &Path) -> io::Result<Self> {
        let path = dir.join(LOCK_FILE);
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        if !lock_exclusive(&file)? {
            let holder = read_holder(&path)
                .map_or_else(|| "unknown process".to_string(), |pid| format!("pid {pid}"));
            return Err(io::Error::new(
                ErrorKind::WouldBlock,
                format!("profile directory {} is locked by {holder}", dir.display()),
            ));
        }

        file.set_len(0)?;
        write!(file, "{}", std::process::id())?;
        file.flush()?;

        Ok(Self { _file: file, path })
    }

    /// Returns the path to the lock file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read_holder(path: &Path) -> Option<u32> {
    fs::read_to_string(path).ok()?.trim().parse().ok()
}

/// Returns `Ok(false)` when the lock is held elsewhere.
#[cfg(unix)]
fn lock_exclusive(file: &File) -> io::Result<bool> {
    use std::os::unix::io::AsRawFd;

    // SAFETY: the descriptor is owned by `file` and stays open for the call.
    let rc = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
    if rc == 0 {
        return Ok(true);
    }
    let err = io::Error::last_os_error();
    if err.raw_os_error() == Some(libc::EWOULDBLOCK) {
        Ok(false)
    } else {
        Err(err)
    }
}

/// Returns `Ok(false)` when the lock is held elsewhere.
#[cfg(windows)]
fn lock_exclusive(file: &File) -> io::Result<bool> {
    use std::os::windows::io::AsRawHandle;
    use windows_sys::Win32::Foundation::{ERROR_LOCK_VIOLATION, HANDLE};
    use windows_sys::Win32::Storage::FileSystem::{
        LockFileEx, LOCKFILE_EXCLUSIVE_LOCK, LOCKFILE_FAIL_IMMEDIATELY,
    };
    use windows_sys::Win32::System::IO::OVERLAPPED;

    // SAFETY: the handle is owned by `file`; OVERLAPPED is plain data and may be zeroed.
    let ok = unsafe {
        let mut overlapped: OVERLAPPED = std::mem::zeroed();
        LockFileEx(
            file.as_raw_handle() as HANDLE,
            LOCKFILE_EXCLUSIVE_LOCK | LOCKFILE_FAIL_IMMEDIATELY,
            0,
            1,
            0,
            &mut overlapped,
        )
    };
    if ok != 0 {
        return Ok(true);
    }
    let err = io::Error::last_os_error();
    #[allow(clippy::cast_possible_wrap)]
    if err.raw_os_error() == Some(ERROR_LOCK_VIOLATION as i32) {
        Ok(false)
    } else {
        Err(err)
    }
}

#[cfg(not(any(unix, windows)))]
fn lock_exclusive(_file: &File) -> io::Result<bool> {
    Err(io::Error::new(
        ErrorKind::Unsupported,
        "directory locking is not supported on this platform",
    ))
}
