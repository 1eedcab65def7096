//! Row group encoding and decoding
//!
//! A row group stores one batch of rows column by column:
//! ```text
//! +--------------------+-----+------------------------+--------+-----+------------------------+
//! | descriptor col 0   | ... | descriptor col C-1     | data 0 | ... | data C-1               |
//! | kind u8 | len u32  |     | kind u8 | len u32      |        |     |                        |
//! +--------------------+-----+------------------------+--------+-----+------------------------+
//! ```
//! `Direct` column data is `len / 4` little-endian `u32` cells in row order.

use crate::codec::error::{CodecError, CodecResult};
use crate::types::{CELL_SIZE, COLUMN_DESCRIPTOR_SIZE, Cell, Row};
use std::fmt;
use std::io::{self, Read, Write};

/// Upper bound on buffers sized from a caller-supplied column count
const MAX_PREALLOCATED_COLUMNS: usize = 1024;

/// How a column's bytes are encoded
///
/// Only `Direct` exists today. New kinds get new tag values; existing tags never
/// change meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RepresentationKind {
    /// Raw fixed-width cells
    Direct = 0,
}

impl RepresentationKind {
    /// On-disk tag byte
    #[inline]
    pub fn tag(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for RepresentationKind {
    type Error = CodecError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(RepresentationKind::Direct),
            other => Err(CodecError::UnsupportedRepresentation(other)),
        }
    }
}

impl fmt::Display for RepresentationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepresentationKind::Direct => write!(f, "Direct"),
        }
    }
}

/// Per-column descriptor at the start of a row group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Representation of the column data
    pub kind: RepresentationKind,
    /// Size in bytes of the column data within this row group
    pub byte_length: u32,
}

impl ColumnDescriptor {
    /// Descriptor for a `Direct` column of `row_count` cells
    pub fn direct(row_count: usize) -> CodecResult<Self> {
        let byte_length = row_count
            .checked_mul(CELL_SIZE)
            .and_then(|len| u32::try_from(len).ok())
            .ok_or(CodecError::ColumnTooLarge { rows: row_count })?;
        Ok(Self {
            kind: RepresentationKind::Direct,
            byte_length,
        })
    }

    /// Serialize to the 5-byte on-disk form
    pub fn to_bytes(&self) -> [u8; COLUMN_DESCRIPTOR_SIZE] {
        let mut bytes = [0u8; COLUMN_DESCRIPTOR_SIZE];
        bytes[0] = self.kind.tag();
        bytes[1..].copy_from_slice(&self.byte_length.to_le_bytes());
        bytes
    }

    /// Parse the 5-byte on-disk form, rejecting unknown representation kinds
    pub fn from_bytes(bytes: &[u8; COLUMN_DESCRIPTOR_SIZE]) -> CodecResult<Self> {
        let kind = RepresentationKind::try_from(bytes[0])?;
        let byte_length = u32::from_le_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]);
        Ok(Self { kind, byte_length })
    }

    /// Number of cells in the column, checking cell alignment
    pub fn cell_count(&self, column: usize) -> CodecResult<usize> {
        match self.kind {
            RepresentationKind::Direct => {
                if self.byte_length as usize % CELL_SIZE != 0 {
                    return Err(CodecError::MisalignedColumn {
                        column,
                        byte_length: self.byte_length,
                    });
                }
                Ok(self.byte_length as usize / CELL_SIZE)
            }
        }
    }
}

/// Encode a non-empty, rectangular batch of rows as one row group
///
/// Rows arrive row-major and are written column-major. Fails with
/// `EmptyInput` for an empty batch or zero-width rows and `RaggedRows` when a
/// row's width differs from the first row's.
pub fn encode_row_group<R: AsRef<[Cell]>>(rows: &[R]) -> CodecResult<Vec<u8>> {
    let first = rows.first().ok_or(CodecError::EmptyInput)?;
    let column_count = first.as_ref().len();
    if column_count == 0 {
        return Err(CodecError::EmptyInput);
    }

    if let Some((row, actual)) = rows
        .iter()
        .map(|r| r.as_ref().len())
        .enumerate()
        .find(|&(_, width)| width != column_count)
    {
        return Err(CodecError::RaggedRows {
            row,
            expected: column_count,
            actual,
        });
    }

    let descriptor = ColumnDescriptor::direct(rows.len())?;
    let mut buf = Vec::with_capacity(
        column_count * (COLUMN_DESCRIPTOR_SIZE + descriptor.byte_length as usize),
    );

    for _ in 0..column_count {
        buf.extend_from_slice(&descriptor.to_bytes());
    }
    for column in 0..column_count {
        for row in rows {
            buf.extend_from_slice(&row.as_ref()[column].to_le_bytes());
        }
    }

    log::trace!(
        "encoded row group: {} rows x {} columns, {} bytes",
        rows.len(),
        column_count,
        buf.len()
    );
    Ok(buf)
}

/// Encode `rows` and write the row group with a single `write_all`
pub fn write_row_group<W: Write, R: AsRef<[Cell]>>(writer: &mut W, rows: &[R]) -> CodecResult<usize> {
    let bytes = encode_row_group(rows)?;
    writer.write_all(&bytes)?;
    Ok(bytes.len())
}

/// Outcome of reading one row group from a stream
#[derive(Debug)]
enum GroupRead {
    /// The stream ended exactly at a row group boundary
    End,
    /// Every descriptor and column block was read in full
    Complete(Vec<Row>),
    /// The stream ended inside the group; rows are the fully read prefix
    Truncated(Vec<Row>),
}

/// Read until `buf` is full or the stream ends, returning the bytes read
fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

fn transpose(columns: &[Vec<Cell>], row_count: usize) -> Vec<Row> {
    (0..row_count)
        .map(|row| columns.iter().map(|column| column[row]).collect())
        .collect()
}

fn read_group<R: Read>(reader: &mut R, column_count: usize) -> CodecResult<GroupRead> {
    // The column count comes from an untrusted header; grow with the data
    let mut descriptors = Vec::with_capacity(column_count.min(MAX_PREALLOCATED_COLUMNS));
    for column in 0..column_count {
        let mut raw = [0u8; COLUMN_DESCRIPTOR_SIZE];
        let n = read_up_to(reader, &mut raw)?;
        if n == 0 && column == 0 {
            return Ok(GroupRead::End);
        }
        if n < COLUMN_DESCRIPTOR_SIZE {
            log::warn!(
                "row group ends inside descriptor {} of {}; returning no rows",
                column,
                column_count
            );
            return Ok(GroupRead::Truncated(Vec::new()));
        }
        descriptors.push(ColumnDescriptor::from_bytes(&raw)?);
    }

    // All descriptors are checked before any column data is read
    let cell_counts = descriptors
        .iter()
        .enumerate()
        .map(|(column, descriptor)| descriptor.cell_count(column))
        .collect::<CodecResult<Vec<_>>>()?;

    let mut columns: Vec<Vec<Cell>> = Vec::with_capacity(descriptors.len());
    let mut truncated = false;
    for (column, descriptor) in descriptors.iter().enumerate() {
        let mut bytes = Vec::new();
        reader
            .by_ref()
            .take(u64::from(descriptor.byte_length))
            .read_to_end(&mut bytes)?;

        let cells = bytes
            .chunks_exact(CELL_SIZE)
            .map(|chunk| Cell::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect::<Vec<_>>();
        columns.push(cells);

        if bytes.len() < descriptor.byte_length as usize {
            log::warn!(
                "row group ends inside column {} ({} of {} bytes)",
                column,
                bytes.len(),
                descriptor.byte_length
            );
            truncated = true;
            break;
        }
    }

    if truncated {
        // Columns never reached hold no cells, so they bound the prefix at zero.
        let row_count = if columns.len() < column_count {
            0
        } else {
            columns.iter().map(Vec::len).min().unwrap_or(0)
        };
        return Ok(GroupRead::Truncated(transpose(&columns, row_count)));
    }

    let row_count = cell_counts.first().copied().unwrap_or(0);
    if let Some((column, &actual)) = cell_counts
        .iter()
        .enumerate()
        .find(|&(_, &count)| count != row_count)
    {
        return Err(CodecError::RowCountMismatch {
            column,
            expected: row_count,
            actual,
        });
    }

    Ok(GroupRead::Complete(transpose(&columns, row_count)))
}

/// Decode one row group of `column_count` columns from the current stream position
///
/// If the stream ends inside the group, decoding stops without an error and the
/// rows for which every column was fully read are returned. A stream that is
/// already at its end yields no rows.
pub fn decode_row_group<R: Read>(reader: &mut R, column_count: usize) -> CodecResult<Vec<Row>> {
    match read_group(reader, column_count)? {
        GroupRead::End => Ok(Vec::new()),
        GroupRead::Complete(rows) | GroupRead::Truncated(rows) => Ok(rows),
    }
}

/// Decode consecutive row groups until the stream ends, concatenating their rows
///
/// A truncated trailing group contributes its fully read prefix and ends the scan.
pub fn decode_row_groups<R: Read>(reader: &mut R, column_count: usize) -> CodecResult<Vec<Row>> {
    let mut rows = Vec::new();
    if column_count == 0 {
        return Ok(rows);
    }

    let mut groups = 0usize;
    loop {
        match read_group(reader, column_count)? {
            GroupRead::End => break,
            GroupRead::Complete(group) => {
                groups += 1;
                rows.extend(group);
            }
            GroupRead::Truncated(group) => {
                groups += 1;
                rows.extend(group);
                break;
            }
        }
    }

    log::debug!("decoded {} row groups, {} rows", groups, rows.len());
    Ok(rows)
}
