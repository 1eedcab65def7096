//! Binary layout codec
//!
//! Bit-exact translation between in-memory rows and the table file layout:
//! - Table header: `entry_count` and `column_count`, each a `u32`
//! - Row groups: one descriptor per column, then each column's data block
//! - `Direct` representation: contiguous little-endian `u32` cells
//!
//! All functions work on any `Read`/`Write`/`Seek` stream; the table handle
//! supplies the file.

pub mod error;
pub mod header;
pub mod row_group;

pub use error::{CodecError, CodecResult};
pub use header::{
    TableHeader, read_column_count, read_entry_count, read_header, write_column_count,
    write_entry_count, write_header,
};
pub use row_group::{
    ColumnDescriptor, RepresentationKind, decode_row_group, decode_row_groups, encode_row_group,
    write_row_group,
};
