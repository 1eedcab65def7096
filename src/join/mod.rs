//! Join engine
//!
//! Materializes pairwise combinations of two tables' rows into a new table file.
//! Both inputs are read completely into memory, then the output is written as a
//! single row group. Output rows are always `left_row ++ right_row`, and the
//! output table has `left + right` columns.
//!
//! Neither join is transactional: if the process dies between the append and
//! the final header write, the destination understates its row count until
//! `ColumnarTable::repair_entry_count` is run.

use crate::table::{ColumnarTable, JoinSide, TableError, TableResult};
use crate::types::{Cell, Row};
use std::path::Path;

fn concat(left: &[Cell], right: &[Cell]) -> Row {
    let mut row = Vec::with_capacity(left.len() + right.len());
    row.extend_from_slice(left);
    row.extend_from_slice(right);
    row
}

/// Cartesian product of two row sets in left-major order
///
/// All pairs for left row 0 come first (in right-row order), then left row 1, and so on.
pub fn cross_join_rows(left: &[Row], right: &[Row]) -> Vec<Row> {
    left.iter()
        .flat_map(|l| right.iter().map(move |r| concat(l, r)))
        .collect()
}

fn check_indices(indices: &[u32], row_count: usize, side: JoinSide) -> TableResult<()> {
    match indices.iter().find(|&&index| index as usize >= row_count) {
        Some(&index) => Err(TableError::IndexOutOfRange {
            side,
            index,
            row_count,
        }),
        None => Ok(()),
    }
}

/// Concatenate `left[i] ++ right[j]` for `i` in `left_indices` (outer loop) and
/// `j` in `right_indices` (inner loop)
///
/// Indices are used as given, duplicates included. Any index past the end of its
/// row set fails with `IndexOutOfRange` before a single row is produced.
pub fn indexed_join_rows(
    left: &[Row],
    right: &[Row],
    left_indices: &[u32],
    right_indices: &[u32],
) -> TableResult<Vec<Row>> {
    check_indices(left_indices, left.len(), JoinSide::Left)?;
    check_indices(right_indices, right.len(), JoinSide::Right)?;

    Ok(left_indices
        .iter()
        .flat_map(|&i| {
            right_indices
                .iter()
                .map(move |&j| concat(&left[i as usize], &right[j as usize]))
        })
        .collect())
}

fn output_column_count(left: &ColumnarTable, right: &ColumnarTable) -> TableResult<u32> {
    left.cached_column_count()
        .checked_add(right.cached_column_count())
        .ok_or_else(|| TableError::InvalidArgument("joined column count overflows".to_string()))
}

fn check_cardinality(outer: usize, inner: usize) -> TableResult<u32> {
    outer
        .checked_mul(inner)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| {
            TableError::InvalidArgument(format!(
                "join of {} x {} rows exceeds the entry count limit",
                outer, inner
            ))
        })
}

/// Create the destination table, append `rows` as one group and record the count
fn materialize(
    left: &ColumnarTable,
    new_path: &Path,
    column_count: u32,
    rows: &[Row],
    entry_count: u32,
) -> TableResult<ColumnarTable> {
    let mut joined = ColumnarTable::create_with(new_path, column_count, left.config())?;
    if !rows.is_empty() {
        joined.append_rows(rows)?;
    }
    joined.set_entry_count(entry_count)?;
    Ok(joined)
}

/// Cross join: every left row paired with every right row
///
/// Produces `L * R` rows of `left + right` columns in left-major order and writes
/// them to a new table at `new_path`, which must not exist yet. The source tables
/// are only read.
pub fn cross_join(
    left: &ColumnarTable,
    right: &ColumnarTable,
    new_path: impl AsRef<Path>,
) -> TableResult<ColumnarTable> {
    let new_path = new_path.as_ref();
    let column_count = output_column_count(left, right)?;

    let left_rows = left.scan_rows()?;
    let right_rows = right.scan_rows()?;
    let entry_count = check_cardinality(left_rows.len(), right_rows.len())?;

    log::debug!(
        "cross join {} ({} rows) x {} ({} rows) -> {}",
        left.name(),
        left_rows.len(),
        right.name(),
        right_rows.len(),
        new_path.display()
    );

    let rows = cross_join_rows(&left_rows, &right_rows);
    materialize(left, new_path, column_count, &rows, entry_count)
}

/// Cartesian product under the name the command line has always used
///
/// This is not a null-padded relational outer join; see `cross_join`.
pub fn full_outer_join(
    left: &ColumnarTable,
    right: &ColumnarTable,
    new_path: impl AsRef<Path>,
) -> TableResult<ColumnarTable> {
    cross_join(left, right, new_path)
}

/// Index-driven join: rows `left_indices x right_indices`, concatenated
///
/// Rows are matched by position, not by key. Output order follows the outer loop
/// over `left_indices` and the inner loop over `right_indices`. Indices are
/// validated before the destination file is created.
pub fn inner_join(
    left: &ColumnarTable,
    right: &ColumnarTable,
    new_path: impl AsRef<Path>,
    left_indices: &[u32],
    right_indices: &[u32],
) -> TableResult<ColumnarTable> {
    let new_path = new_path.as_ref();
    let column_count = output_column_count(left, right)?;

    let left_rows = left.scan_rows()?;
    let right_rows = right.scan_rows()?;
    let entry_count = check_cardinality(left_indices.len(), right_indices.len())?;
    let rows = indexed_join_rows(&left_rows, &right_rows, left_indices, right_indices)?;

    log::debug!(
        "inner join {} [{} indices] x {} [{} indices] -> {}",
        left.name(),
        left_indices.len(),
        right.name(),
        right_indices.len(),
        new_path.display()
    );

    materialize(left, new_path, column_count, &rows, entry_count)
}
