//! Columnar table handle
//!
//! A `ColumnarTable` owns the path of one table file plus a write-through cache of
//! its header. It never keeps the file open between calls: every operation opens
//! the file, does its work and drops the handle (and its advisory lock) before
//! returning, on success and on error alike.
//!
//! The store assumes a single writer. Advisory locks make a conflicting handle
//! fail with `VfsError::Locked` instead of interleaving writes; they do not make
//! concurrent use safe.

use crate::codec::{
    self, TableHeader, decode_row_group, decode_row_groups, encode_row_group, read_header,
    write_entry_count, write_header,
};
use crate::table::error::{TableError, TableResult};
use crate::types::{Cell, Row, TABLE_HEADER_SIZE, TableConfig};
use crate::vfs::{LocalFs, OpenMode, VfsInterface};
use serde::Serialize;
use std::io::{BufReader, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Handle to one table file
#[derive(Debug, Clone)]
pub struct ColumnarTable {
    /// Table file path
    path: PathBuf,
    /// Cached `entry_count`; re-persisted by every mutating call
    entry_count: u32,
    /// Cached `column_count`; fixed at creation
    column_count: u32,
    /// Handle configuration
    config: TableConfig,
    fs: LocalFs,
}

/// Full contents of a table, for printing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSnapshot {
    /// Table name (the file path as given)
    pub name: String,
    /// Persisted `entry_count`
    pub entry_count: u32,
    /// Persisted `column_count`
    pub column_count: u32,
    /// Every row of every row group
    pub rows: Vec<Row>,
}

impl ColumnarTable {
    /// Create a new table file with the default configuration
    pub fn create(path: impl AsRef<Path>, column_count: u32) -> TableResult<Self> {
        Self::create_with(path, column_count, TableConfig::default())
    }

    /// Create a new table file holding only the header `(0, column_count)`
    ///
    /// Fails with `AlreadyExists` if anything is present at `path`; the existing
    /// file is left untouched. If writing the header fails, the new file is
    /// removed again.
    pub fn create_with(
        path: impl AsRef<Path>,
        column_count: u32,
        config: TableConfig,
    ) -> TableResult<Self> {
        let path = path.as_ref().to_path_buf();
        if column_count == 0 {
            return Err(TableError::InvalidArgument(
                "a table needs at least one column".to_string(),
            ));
        }

        let fs = LocalFs::with_locking(config.lock_files);
        let mut file = fs.create_file(&path)?;
        let written = write_header(&mut *file, &TableHeader::new(column_count))
            .map_err(TableError::from)
            .and_then(|()| {
                if config.sync_on_write {
                    file.sync_all()?;
                }
                Ok(())
            });
        drop(file);
        if let Err(err) = written {
            discard_partial_file(&fs, &path);
            return Err(err);
        }

        log::debug!(
            "created table {} with {} columns",
            path.display(),
            column_count
        );
        Ok(Self {
            path,
            entry_count: 0,
            column_count,
            config,
            fs,
        })
    }

    /// Open an existing table file with the default configuration
    pub fn open(path: impl AsRef<Path>) -> TableResult<Self> {
        Self::open_with(path, TableConfig::default())
    }

    /// Open an existing table file and cache its header
    ///
    /// Row-group bytes are not checked against `entry_count`.
    pub fn open_with(path: impl AsRef<Path>, config: TableConfig) -> TableResult<Self> {
        let path = path.as_ref().to_path_buf();
        let fs = LocalFs::with_locking(config.lock_files);
        let header = {
            let mut file = fs.open_file(&path, OpenMode::Read)?;
            read_header(&mut *file)?
        };

        log::debug!(
            "opened table {}: {} entries, {} columns",
            path.display(),
            header.entry_count,
            header.column_count
        );
        Ok(Self {
            path,
            entry_count: header.entry_count,
            column_count: header.column_count,
            config,
            fs,
        })
    }

    /// Remove a table file
    pub fn remove(path: impl AsRef<Path>) -> TableResult<()> {
        LocalFs::new().remove_file(path.as_ref())?;
        Ok(())
    }

    /// Append `rows` as one row group at the end of the file
    ///
    /// Every row must have exactly `column_count` values. Prior data is never
    /// rewritten; afterwards the header `entry_count` grows by one per row.
    pub fn append_rows<R: AsRef<[Cell]>>(&mut self, rows: &[R]) -> TableResult<()> {
        let expected = self.column_count as usize;
        if let Some((row, actual)) = rows
            .iter()
            .map(|r| r.as_ref().len())
            .enumerate()
            .find(|&(_, width)| width != expected)
        {
            return Err(TableError::WidthMismatch {
                row,
                expected,
                actual,
            });
        }

        let new_count = u32::try_from(rows.len())
            .ok()
            .and_then(|added| self.entry_count.checked_add(added))
            .ok_or_else(|| {
                TableError::InvalidArgument(format!(
                    "appending {} rows overflows the entry count of {}",
                    rows.len(),
                    self.path.display()
                ))
            })?;

        let bytes = encode_row_group(rows)?;
        {
            let mut file = self.fs.open_file(&self.path, OpenMode::Append)?;
            file.write_all(&bytes)?;
            if self.config.sync_on_write {
                file.sync_data()?;
            }
        }

        log::debug!(
            "appended row group to {}: {} rows, {} bytes",
            self.path.display(),
            rows.len(),
            bytes.len()
        );
        self.set_entry_count(new_count)
    }

    /// Decode the first row group after the header using `column_count` columns
    ///
    /// Later row groups are not read; use `scan_rows` for those.
    pub fn read_all_rows(&self, column_count: u32) -> TableResult<Vec<Row>> {
        let mut file = self.fs.open_file(&self.path, OpenMode::Read)?;
        file.seek(SeekFrom::Start(TABLE_HEADER_SIZE as u64))?;
        let rows = decode_row_group(&mut BufReader::new(&mut *file), column_count as usize)?;
        Ok(rows)
    }

    /// Decode every row group in the file using the table's column count
    pub fn scan_rows(&self) -> TableResult<Vec<Row>> {
        let mut file = self.fs.open_file(&self.path, OpenMode::Read)?;
        file.seek(SeekFrom::Start(TABLE_HEADER_SIZE as u64))?;
        let rows = decode_row_groups(
            &mut BufReader::new(&mut *file),
            self.column_count as usize,
        )?;
        Ok(rows)
    }

    /// Overwrite the cached and persisted `entry_count`
    ///
    /// Only header bytes 0..4 are written; `column_count` is untouched.
    pub fn set_entry_count(&mut self, entry_count: u32) -> TableResult<()> {
        let mut file = self.fs.open_file(&self.path, OpenMode::ReadWrite)?;
        write_entry_count(&mut *file, entry_count)?;
        if self.config.sync_on_write {
            file.sync_data()?;
        }
        self.entry_count = entry_count;
        Ok(())
    }

    /// `entry_count` as currently persisted on disk
    pub fn entry_count(&self) -> TableResult<u32> {
        let mut file = self.fs.open_file(&self.path, OpenMode::Read)?;
        Ok(codec::read_entry_count(&mut *file)?)
    }

    /// `column_count` as currently persisted on disk
    pub fn column_count(&self) -> TableResult<u32> {
        let mut file = self.fs.open_file(&self.path, OpenMode::Read)?;
        Ok(codec::read_column_count(&mut *file)?)
    }

    /// Count the rows actually stored across all row groups
    pub fn recount_entries(&self) -> TableResult<u32> {
        let file_size = self.fs.file_size(&self.path)?;
        let rows = self.scan_rows()?;
        log::debug!(
            "{}: {} rows in {} bytes",
            self.path.display(),
            rows.len(),
            file_size
        );
        u32::try_from(rows.len()).map_err(|_| {
            TableError::InvalidArgument(format!(
                "{} holds more rows than the header can record",
                self.path.display()
            ))
        })
    }

    /// Recount the stored rows and persist the result as `entry_count`
    ///
    /// Recovers a header left stale by an interrupted join. Returns the new count.
    pub fn repair_entry_count(&mut self) -> TableResult<u32> {
        let actual = self.recount_entries()?;
        if actual != self.entry_count {
            log::warn!(
                "{}: header records {} entries, file holds {}",
                self.path.display(),
                self.entry_count,
                actual
            );
        }
        self.set_entry_count(actual)?;
        Ok(actual)
    }

    /// Read the header and every row for display
    pub fn snapshot(&self) -> TableResult<TableSnapshot> {
        let header = {
            let mut file = self.fs.open_file(&self.path, OpenMode::Read)?;
            read_header(&mut *file)?
        };
        Ok(TableSnapshot {
            name: self.name(),
            entry_count: header.entry_count,
            column_count: header.column_count,
            rows: self.scan_rows()?,
        })
    }

    /// `entry_count` as last written by this handle
    pub fn cached_entry_count(&self) -> u32 {
        self.entry_count
    }

    /// `column_count` as read at create/open time
    pub fn cached_column_count(&self) -> u32 {
        self.column_count
    }

    /// Table file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Table name, the file path as given
    pub fn name(&self) -> String {
        self.path.display().to_string()
    }

    /// Handle configuration
    pub fn config(&self) -> TableConfig {
        self.config
    }
}

/// Best-effort removal of a file left behind by a failed create
pub(crate) fn discard_partial_file(fs: &LocalFs, path: &Path) {
    if let Err(err) = fs.remove_file(path) {
        log::warn!(
            "could not remove partially created table {}: {}",
            path.display(),
            err
        );
    }
}
