//! VFS interface definitions

use crate::vfs::error::VfsResult;
use crate::vfs::local_fs::LockedFile;
use std::path::Path;

/// Access mode for `VfsInterface::open_file`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Read only, shared lock
    Read,
    /// Read and positioned write, exclusive lock
    ReadWrite,
    /// Writes always land at the end of the file, exclusive lock
    Append,
}

impl OpenMode {
    /// Whether this mode mutates the file
    pub fn is_write(&self) -> bool {
        !matches!(self, OpenMode::Read)
    }
}

/// VFS interface trait
/// This trait defines the file operations the table store needs from the host file system
pub trait VfsInterface {
    /// Create a new, empty file
    ///
    /// # Arguments
    /// * `path` - The path to the file to create
    ///
    /// # Returns
    /// * `Ok(LockedFile)` opened read/write if the file was created
    /// * `Err(VfsError::AlreadyExists)` if a file is already present; it is left untouched
    fn create_file(&self, path: &Path) -> VfsResult<LockedFile>;

    /// Open an existing file
    ///
    /// # Arguments
    /// * `path` - The path to the file to open
    /// * `mode` - Access mode, which also selects the lock kind
    ///
    /// # Returns
    /// * `Ok(LockedFile)` if the file was opened
    /// * `Err(VfsError)` if an error occurred
    fn open_file(&self, path: &Path, mode: OpenMode) -> VfsResult<LockedFile>;

    /// Remove an existing file
    fn remove_file(&self, path: &Path) -> VfsResult<()>;

    /// Current length of the file in bytes
    fn file_size(&self, path: &Path) -> VfsResult<u64>;
}
