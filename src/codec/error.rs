//! Codec error definitions

use std::error::Error;
use std::fmt;
use std::io;

/// Codec error types
///
/// Raised while translating rows to and from the on-disk row-group layout.
#[derive(Debug)]
pub enum CodecError {
    /// A column descriptor carries a representation tag this build does not know
    UnsupportedRepresentation(u8),
    /// A column's declared byte length is not a whole number of cells
    MisalignedColumn { column: usize, byte_length: u32 },
    /// Decoded columns disagree on their row count
    RowCountMismatch {
        column: usize,
        expected: usize,
        actual: usize,
    },
    /// Encoder called with no rows, so the column count cannot be inferred
    EmptyInput,
    /// A row in the batch is wider or narrower than the first row
    RaggedRows {
        row: usize,
        expected: usize,
        actual: usize,
    },
    /// A column would not fit the 32-bit byte length field
    ColumnTooLarge { rows: usize },
    /// The header is shorter than its fixed size
    Truncated { offset: u64, needed: usize },
    /// I/O error while reading or writing
    IoError(io::Error),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::UnsupportedRepresentation(tag) => {
                write!(f, "Unsupported column representation kind: {}", tag)
            }
            CodecError::MisalignedColumn {
                column,
                byte_length,
            } => write!(
                f,
                "Column {} has byte length {} which is not a multiple of the cell size",
                column, byte_length
            ),
            CodecError::RowCountMismatch {
                column,
                expected,
                actual,
            } => write!(
                f,
                "Column {} holds {} rows but column 0 holds {}",
                column, actual, expected
            ),
            CodecError::EmptyInput => write!(f, "Cannot encode an empty row group"),
            CodecError::RaggedRows {
                row,
                expected,
                actual,
            } => write!(
                f,
                "Row {} has {} values, expected {}",
                row, actual, expected
            ),
            CodecError::ColumnTooLarge { rows } => {
                write!(f, "Row group of {} rows exceeds the column size limit", rows)
            }
            CodecError::Truncated { offset, needed } => {
                write!(f, "Truncated data: needed {} bytes at offset {}", needed, offset)
            }
            CodecError::IoError(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CodecError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for CodecError {
    fn from(err: io::Error) -> Self {
        CodecError::IoError(err)
    }
}

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;
