//! Global type definitions
//!
//! Stores constants, type aliases and the table configuration shared by the codec,
//! the table handle and the join engine.

use serde::{Deserialize, Serialize};

/// A single fixed-width cell
pub type Cell = u32;

/// One row, `column_count` cells wide
pub type Row = Vec<Cell>;

/// Size of one `Direct` cell on disk
pub const CELL_SIZE: usize = std::mem::size_of::<Cell>();

/// Offset of `entry_count` in the table header
pub const ENTRY_COUNT_OFFSET: u64 = 0;

/// Offset of `column_count` in the table header
pub const COLUMN_COUNT_OFFSET: u64 = 4;

/// Table header size (entry_count + column_count)
pub const TABLE_HEADER_SIZE: usize = 8;

/// Column descriptor size (representation kind + byte length)
pub const COLUMN_DESCRIPTOR_SIZE: usize = 5;

/// Table handle configuration
///
/// Every field has a safe default; the CLI maps its flags onto this struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Take an advisory `flock` on the table file for the duration of each call
    pub lock_files: bool,
    /// `fsync` the table file after appends and header writes
    pub sync_on_write: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            lock_files: true,
            sync_on_write: false,
        }
    }
}
