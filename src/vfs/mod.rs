//! VFS (Virtual File System) module
//!
//! This module provides the file operations the table store relies on (existence
//! checks, exclusive creation, scoped opening, removal), with a local file system
//! implementation that can guard each open file with an advisory lock.

// Re-export error types and result type
pub mod error;
pub use error::{VfsError, VfsResult};

// Re-export interface traits
pub mod interface;
pub use interface::{OpenMode, VfsInterface};

// Re-export local file system implementation
pub mod local_fs;
pub use local_fs::{LocalFs, LockedFile};
