//! Local file system implementation
//!
//! Files are opened through `std::fs`; advisory locking uses `flock(2)` from glibc.

use crate::vfs::error::{VfsError, VfsResult};
use crate::vfs::interface::{OpenMode, VfsInterface};
use libc::c_int;
use std::fs::{self, File, OpenOptions};
use std::ops::{Deref, DerefMut};
use std::os::unix::io::AsRawFd;
use std::path::Path;

/// An open file, optionally holding an advisory lock
///
/// The lock is released and the descriptor closed when the value is dropped, on
/// every exit path.
#[derive(Debug)]
pub struct LockedFile {
    file: File,
    locked: bool,
}

impl LockedFile {
    fn acquire(file: File, path: &Path, mode: OpenMode, lock: bool) -> VfsResult<Self> {
        if !lock {
            return Ok(Self {
                file,
                locked: false,
            });
        }

        let op: c_int = if mode.is_write() {
            libc::LOCK_EX
        } else {
            libc::LOCK_SH
        };

        let result = unsafe { libc::flock(file.as_raw_fd(), op | libc::LOCK_NB) };

        if result < 0 {
            let err = std::io::Error::last_os_error();
            return match err.raw_os_error() {
                Some(libc::EWOULDBLOCK) => Err(VfsError::Locked(path.display().to_string())),
                _ => Err(VfsError::IoError(err)),
            };
        }

        Ok(Self { file, locked: true })
    }

    /// Whether an advisory lock is held
    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

impl Deref for LockedFile {
    type Target = File;

    fn deref(&self) -> &File {
        &self.file
    }
}

impl DerefMut for LockedFile {
    fn deref_mut(&mut self) -> &mut File {
        &mut self.file
    }
}

impl Drop for LockedFile {
    fn drop(&mut self) {
        if self.locked {
            // Duplicated descriptors would otherwise keep the lock alive
            let _ = unsafe { libc::flock(self.file.as_raw_fd(), libc::LOCK_UN) };
        }
    }
}

/// Local file system implementation
#[derive(Debug, Clone, Copy)]
pub struct LocalFs {
    lock_files: bool,
}

impl LocalFs {
    /// Create a new LocalFs instance that takes advisory locks
    pub fn new() -> Self {
        LocalFs { lock_files: true }
    }

    /// Create a LocalFs instance with locking switched on or off
    pub fn with_locking(lock_files: bool) -> Self {
        LocalFs { lock_files }
    }

    fn open_options(mode: OpenMode) -> OpenOptions {
        let mut options = OpenOptions::new();
        match mode {
            OpenMode::Read => options.read(true),
            OpenMode::ReadWrite => options.read(true).write(true),
            OpenMode::Append => options.append(true),
        };
        options
    }
}

impl Default for LocalFs {
    fn default() -> Self {
        Self::new()
    }
}

impl VfsInterface for LocalFs {
    fn create_file(&self, path: &Path) -> VfsResult<LockedFile> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| VfsError::from_io(e, path))?;

        log::trace!("created file {}", path.display());
        LockedFile::acquire(file, path, OpenMode::ReadWrite, self.lock_files)
    }

    fn open_file(&self, path: &Path, mode: OpenMode) -> VfsResult<LockedFile> {
        let file = Self::open_options(mode)
            .open(path)
            .map_err(|e| VfsError::from_io(e, path))?;

        LockedFile::acquire(file, path, mode, self.lock_files)
    }

    fn remove_file(&self, path: &Path) -> VfsResult<()> {
        fs::remove_file(path).map_err(|e| VfsError::from_io(e, path))?;
        log::debug!("removed file {}", path.display());
        Ok(())
    }

    fn file_size(&self, path: &Path) -> VfsResult<u64> {
        let metadata = fs::metadata(path).map_err(|e| VfsError::from_io(e, path))?;
        Ok(metadata.len())
    }
}

