//! Table module for single-file columnar tables
//!
//! This module implements the table handle with the following features:
//! - Table creation with a fixed column count and header persistence
//! - Row group appends with a write-through entry count
//! - Full reads of one or all row groups
//! - Entry count recovery after interrupted writes

pub mod error;
pub mod table;

pub use error::{JoinSide, TableError, TableResult};
pub use table::ColumnarTable;
pub use table::TableSnapshot;
