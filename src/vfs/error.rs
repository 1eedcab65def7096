//! VFS error definitions

use std::error::Error;
use std::fmt;
use std::io;
use std::path::Path;

/// VFS error types
#[derive(Debug)]
pub enum VfsError {
    /// Permission denied error
    PermissionDenied(String),
    /// File not found error
    NotFound(String),
    /// File already exists error
    AlreadyExists(String),
    /// Advisory lock held by another handle
    Locked(String),
    /// I/O error
    IoError(io::Error),
}

impl VfsError {
    /// Classify an `io::Error` raised while operating on `path`
    pub fn from_io(err: io::Error, path: &Path) -> Self {
        let path = path.display().to_string();
        match err.kind() {
            io::ErrorKind::NotFound => VfsError::NotFound(path),
            io::ErrorKind::AlreadyExists => VfsError::AlreadyExists(path),
            io::ErrorKind::PermissionDenied => VfsError::PermissionDenied(path),
            _ => VfsError::IoError(err),
        }
    }
}

impl fmt::Display for VfsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VfsError::PermissionDenied(path) => write!(f, "Permission denied: {}", path),
            VfsError::NotFound(path) => write!(f, "File not found: {}", path),
            VfsError::AlreadyExists(path) => write!(f, "File already exists: {}", path),
            VfsError::Locked(path) => write!(f, "File is locked by another handle: {}", path),
            VfsError::IoError(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl Error for VfsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            VfsError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for VfsError {
    fn from(err: io::Error) -> Self {
        VfsError::IoError(err)
    }
}

/// Result type for VFS operations
pub type VfsResult<T> = Result<T, VfsError>;
