//! Table error definitions

use crate::codec::CodecError;
use crate::vfs::VfsError;
use std::error::Error;
use std::fmt;
use std::io;

/// Which input of a join an index refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinSide {
    /// Left input
    Left,
    /// Right input
    Right,
}

impl fmt::Display for JoinSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinSide::Left => write!(f, "left"),
            JoinSide::Right => write!(f, "right"),
        }
    }
}

/// Table error types
///
/// Represents all possible errors that can occur during table operations
/// such as creation, appends, reads and joins.
#[derive(Debug)]
pub enum TableError {
    /// A file already exists at the table path
    AlreadyExists(String),
    /// No file at the table path
    NotFound(String),
    /// I/O error during table operation
    IoError(io::Error),
    /// File system error other than the above (permissions, locking)
    Vfs(VfsError),
    /// Malformed row batch or table data
    Codec(CodecError),
    /// Appended row width differs from the table's column count
    WidthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },
    /// A join index references a row that does not exist
    IndexOutOfRange {
        side: JoinSide,
        index: u32,
        row_count: usize,
    },
    /// Invalid argument provided
    InvalidArgument(String),
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::AlreadyExists(path) => write!(f, "Table already exists: {}", path),
            TableError::NotFound(path) => write!(f, "Table not found: {}", path),
            TableError::IoError(err) => write!(f, "I/O error: {}", err),
            TableError::Vfs(err) => write!(f, "{}", err),
            TableError::Codec(err) => write!(f, "Table data error: {}", err),
            TableError::WidthMismatch {
                row,
                expected,
                actual,
            } => write!(
                f,
                "Row {} has {} values but the table has {} columns",
                row, actual, expected
            ),
            TableError::IndexOutOfRange {
                side,
                index,
                row_count,
            } => write!(
                f,
                "Row index {} out of range for {} table with {} rows",
                index, side, row_count
            ),
            TableError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
        }
    }
}

impl Error for TableError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TableError::IoError(err) => Some(err),
            TableError::Vfs(err) => Some(err),
            TableError::Codec(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for TableError {
    fn from(err: io::Error) -> Self {
        TableError::IoError(err)
    }
}

impl From<VfsError> for TableError {
    fn from(err: VfsError) -> Self {
        match err {
            VfsError::AlreadyExists(path) => TableError::AlreadyExists(path),
            VfsError::NotFound(path) => TableError::NotFound(path),
            VfsError::IoError(err) => TableError::IoError(err),
            other => TableError::Vfs(other),
        }
    }
}

impl From<CodecError> for TableError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::IoError(err) => TableError::IoError(err),
            other => TableError::Codec(other),
        }
    }
}

/// Result type for table operations
pub type TableResult<T> = Result<T, TableError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_error_display() {
        let err = TableError::AlreadyExists("users.tbl".to_string());
        assert_eq!(err.to_string(), "Table already exists: users.tbl");

        let err = TableError::IndexOutOfRange {
            side: JoinSide::Right,
            index: 5,
            row_count: 3,
        };
        assert_eq!(
            err.to_string(),
            "Row index 5 out of range for right table with 3 rows"
        );
    }

    #[test]
    fn test_table_error_from_vfs() {
        let err: TableError = VfsError::NotFound("a.tbl".to_string()).into();
        assert!(matches!(err, TableError::NotFound(_)));

        let err: TableError = VfsError::Locked("a.tbl".to_string()).into();
        assert!(matches!(err, TableError::Vfs(VfsError::Locked(_))));
    }

    #[test]
    fn test_table_error_from_codec() {
        let io_err = io::Error::new(io::ErrorKind::Other, "disk gone");
        let err: TableError = CodecError::IoError(io_err).into();
        assert!(matches!(err, TableError::IoError(_)));

        let err: TableError = CodecError::EmptyInput.into();
        assert!(matches!(err, TableError::Codec(CodecError::EmptyInput)));
    }
}
