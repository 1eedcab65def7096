//! Table header layout and random-access accessors
//!
//! Layout (8 bytes, little-endian, no magic or version field):
//! ```text
//! Offset  Size  Field
//!   0     4     entry_count
//!   4     4     column_count
//! ```
//!
//! Every accessor seeks to its field before touching it, so the two fields can be
//! read and written independently of each other and of the stream position.

use crate::codec::error::{CodecError, CodecResult};
use crate::types::{COLUMN_COUNT_OFFSET, ENTRY_COUNT_OFFSET, TABLE_HEADER_SIZE};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};

/// In-memory copy of the table header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableHeader {
    /// Number of rows across all row groups
    pub entry_count: u32,
    /// Number of columns, fixed at creation
    pub column_count: u32,
}

impl TableHeader {
    /// Create a header for a freshly created table
    pub fn new(column_count: u32) -> Self {
        Self {
            entry_count: 0,
            column_count,
        }
    }

    /// Serialize to the fixed 8-byte on-disk form
    pub fn to_bytes(&self) -> [u8; TABLE_HEADER_SIZE] {
        let mut bytes = [0u8; TABLE_HEADER_SIZE];
        bytes[..4].copy_from_slice(&self.entry_count.to_le_bytes());
        bytes[4..].copy_from_slice(&self.column_count.to_le_bytes());
        bytes
    }

    /// Parse the fixed 8-byte on-disk form
    pub fn from_bytes(bytes: &[u8]) -> CodecResult<Self> {
        if bytes.len() < TABLE_HEADER_SIZE {
            return Err(CodecError::Truncated {
                offset: 0,
                needed: TABLE_HEADER_SIZE,
            });
        }
        Ok(Self {
            entry_count: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            column_count: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        })
    }
}

fn read_u32_at<R: Read + Seek>(reader: &mut R, offset: u64) -> CodecResult<u32> {
    reader.seek(SeekFrom::Start(offset))?;
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => CodecError::Truncated { offset, needed: 4 },
        _ => CodecError::IoError(e),
    })?;
    Ok(u32::from_le_bytes(buf))
}

fn write_u32_at<W: Write + Seek>(writer: &mut W, offset: u64, value: u32) -> CodecResult<()> {
    writer.seek(SeekFrom::Start(offset))?;
    writer.write_all(&value.to_le_bytes())?;
    Ok(())
}

/// Read the whole header from offset 0
pub fn read_header<R: Read + Seek>(reader: &mut R) -> CodecResult<TableHeader> {
    reader.seek(SeekFrom::Start(0))?;
    let mut buf = [0u8; TABLE_HEADER_SIZE];
    reader.read_exact(&mut buf).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => CodecError::Truncated {
            offset: 0,
            needed: TABLE_HEADER_SIZE,
        },
        _ => CodecError::IoError(e),
    })?;
    TableHeader::from_bytes(&buf)
}

/// Write the whole header at offset 0
pub fn write_header<W: Write + Seek>(writer: &mut W, header: &TableHeader) -> CodecResult<()> {
    writer.seek(SeekFrom::Start(0))?;
    writer.write_all(&header.to_bytes())?;
    Ok(())
}

/// Read `entry_count` (offset 0)
pub fn read_entry_count<R: Read + Seek>(reader: &mut R) -> CodecResult<u32> {
    read_u32_at(reader, ENTRY_COUNT_OFFSET)
}

/// Overwrite `entry_count` (offset 0) without touching `column_count`
pub fn write_entry_count<W: Write + Seek>(writer: &mut W, entry_count: u32) -> CodecResult<()> {
    write_u32_at(writer, ENTRY_COUNT_OFFSET, entry_count)
}

/// Read `column_count` (offset 4)
pub fn read_column_count<R: Read + Seek>(reader: &mut R) -> CodecResult<u32> {
    read_u32_at(reader, COLUMN_COUNT_OFFSET)
}

/// Overwrite `column_count` (offset 4) without touching `entry_count`
pub fn write_column_count<W: Write + Seek>(writer: &mut W, column_count: u32) -> CodecResult<()> {
    write_u32_at(writer, COLUMN_COUNT_OFFSET, column_count)
}
