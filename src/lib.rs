//! Coltable columnar table store library

// Global type definitions
pub mod types;

// Import various modules
pub mod codec;
pub mod join;
pub mod table;
pub mod vfs;

// Re-export table items for easier access
pub use table::{ColumnarTable, TableError, TableResult, TableSnapshot};

// Re-export join entry points
pub use join::{cross_join, full_outer_join, inner_join};

// Re-export vfs items for easier access
pub use vfs::VfsError;
pub use vfs::VfsInterface;
