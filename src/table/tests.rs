// Table module tests

#[cfg(test)]
mod table_tests {
    use crate::codec::CodecError;
    use crate::table::table::discard_partial_file;
    use crate::table::{ColumnarTable, TableError};
    use crate::types::{Row, TableConfig};
    use crate::vfs::{LocalFs, VfsError};
    use std::fs;
    use std::io::Write;
    use tempfile::TempDir;

    fn sample_rows() -> Vec<Row> {
        vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]]
    }

    #[test]
    fn test_create_writes_header() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("users.tbl");

        let table = ColumnarTable::create(&path, 3).unwrap();
        assert_eq!(table.cached_entry_count(), 0);
        assert_eq!(table.cached_column_count(), 3);
        assert_eq!(table.entry_count().unwrap(), 0);
        assert_eq!(table.column_count().unwrap(), 3);

        assert_eq!(fs::read(&path).unwrap(), vec![0, 0, 0, 0, 3, 0, 0, 0]);
    }

    #[test]
    fn test_create_rejects_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("existing.tbl");
        fs::write(&path, b"not a table").unwrap();

        let result = ColumnarTable::create(&path, 2);
        assert!(matches!(result, Err(TableError::AlreadyExists(_))));
        assert_eq!(fs::read(&path).unwrap(), b"not a table");
    }

    #[test]
    fn test_create_rejects_existing_table() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("t.tbl");

        let mut table = ColumnarTable::create(&path, 3).unwrap();
        table.append_rows(&sample_rows()).unwrap();
        let before = fs::read(&path).unwrap();

        assert!(matches!(
            ColumnarTable::create(&path, 5),
            Err(TableError::AlreadyExists(_))
        ));
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_create_rejects_zero_columns() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.tbl");

        let result = ColumnarTable::create(&path, 0);
        assert!(matches!(result, Err(TableError::InvalidArgument(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_open_missing_table() {
        let temp_dir = TempDir::new().unwrap();
        let result = ColumnarTable::open(temp_dir.path().join("missing.tbl"));
        assert!(matches!(result, Err(TableError::NotFound(_))));
    }

    #[test]
    fn test_open_short_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("short.tbl");
        fs::write(&path, [1u8, 0, 0]).unwrap();

        let result = ColumnarTable::open(&path);
        assert!(matches!(
            result,
            Err(TableError::Codec(CodecError::Truncated { .. }))
        ));
    }

    #[test]
    fn test_append_and_read_all_rows() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("t.tbl");

        let mut table = ColumnarTable::create(&path, 3).unwrap();
        table.append_rows(&sample_rows()).unwrap();

        assert_eq!(table.read_all_rows(3).unwrap(), sample_rows());
        assert_eq!(table.cached_entry_count(), 3);
        assert_eq!(table.entry_count().unwrap(), 3);
        assert_eq!(table.column_count().unwrap(), 3);
    }

    #[test]
    fn test_open_reads_header() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("t.tbl");

        {
            let mut table = ColumnarTable::create(&path, 3).unwrap();
            table.append_rows(&sample_rows()).unwrap();
        }

        let table = ColumnarTable::open(&path).unwrap();
        assert_eq!(table.cached_entry_count(), 3);
        assert_eq!(table.cached_column_count(), 3);
        assert_eq!(table.scan_rows().unwrap(), sample_rows());
    }

    #[test]
    fn test_entry_count_grows_per_row() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("wide.tbl");

        // Five columns, two rows: the count must be 2, not 5 or 10
        let mut table = ColumnarTable::create(&path, 5).unwrap();
        table
            .append_rows(&[vec![1u32, 2, 3, 4, 5], vec![6, 7, 8, 9, 10]])
            .unwrap();
        assert_eq!(table.entry_count().unwrap(), 2);

        table.append_rows(&[vec![11u32, 12, 13, 14, 15]]).unwrap();
        assert_eq!(table.entry_count().unwrap(), 3);
    }

    #[test]
    fn test_multiple_row_groups() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("groups.tbl");

        let mut table = ColumnarTable::create(&path, 3).unwrap();
        table.append_rows(&sample_rows()).unwrap();
        table.append_rows(&[vec![10u32, 11, 12]]).unwrap();
        table.append_rows(&[vec![13u32, 14, 15]]).unwrap();

        // read_all_rows stops after the first group
        assert_eq!(table.read_all_rows(3).unwrap(), sample_rows());

        let mut expected = sample_rows();
        expected.push(vec![10, 11, 12]);
        expected.push(vec![13, 14, 15]);
        assert_eq!(table.scan_rows().unwrap(), expected);
        assert_eq!(table.entry_count().unwrap(), 5);
        assert_eq!(table.recount_entries().unwrap(), 5);
    }

    #[test]
    fn test_append_width_mismatch() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("t.tbl");

        let mut table = ColumnarTable::create(&path, 3).unwrap();
        let result = table.append_rows(&[vec![1u32, 2]]);
        assert!(matches!(
            result,
            Err(TableError::WidthMismatch {
                row: 0,
                expected: 3,
                actual: 2
            })
        ));

        // Nothing was written
        assert_eq!(fs::metadata(&path).unwrap().len(), 8);
        assert_eq!(table.entry_count().unwrap(), 0);
    }

    #[test]
    fn test_append_empty_batch() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("t.tbl");

        let mut table = ColumnarTable::create(&path, 3).unwrap();
        let rows: Vec<Row> = Vec::new();
        assert!(matches!(
            table.append_rows(&rows),
            Err(TableError::Codec(CodecError::EmptyInput))
        ));
    }

    #[test]
    fn test_read_empty_table() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("t.tbl");

        let table = ColumnarTable::create(&path, 4).unwrap();
        assert!(table.read_all_rows(4).unwrap().is_empty());
        assert!(table.scan_rows().unwrap().is_empty());
    }

    #[test]
    fn test_set_entry_count_keeps_column_count() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("t.tbl");

        let mut table = ColumnarTable::create(&path, 6).unwrap();
        table.set_entry_count(42).unwrap();

        assert_eq!(table.cached_entry_count(), 42);
        assert_eq!(table.entry_count().unwrap(), 42);
        assert_eq!(table.column_count().unwrap(), 6);
        assert_eq!(fs::read(&path).unwrap(), vec![42, 0, 0, 0, 6, 0, 0, 0]);
    }

    #[test]
    fn test_counts_reflect_disk() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("t.tbl");

        let table = ColumnarTable::create(&path, 2).unwrap();
        let mut other = ColumnarTable::open(&path).unwrap();
        other.set_entry_count(7).unwrap();

        // The first handle's cache is stale, the accessor is not
        assert_eq!(table.cached_entry_count(), 0);
        assert_eq!(table.entry_count().unwrap(), 7);
    }

    #[test]
    fn test_repair_entry_count() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("t.tbl");

        let mut table = ColumnarTable::create(&path, 3).unwrap();
        table.append_rows(&sample_rows()).unwrap();
        table.set_entry_count(0).unwrap();

        assert_eq!(table.recount_entries().unwrap(), 3);
        assert_eq!(table.repair_entry_count().unwrap(), 3);
        assert_eq!(table.entry_count().unwrap(), 3);
    }

    #[test]
    fn test_truncated_trailing_group() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("t.tbl");

        let mut table = ColumnarTable::create(&path, 3).unwrap();
        table.append_rows(&sample_rows()).unwrap();

        // Simulate a crash half way through writing a second group's descriptors
        let mut file = fs::OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(&[0, 4, 0]).unwrap();
        drop(file);

        assert_eq!(table.scan_rows().unwrap(), sample_rows());
        assert_eq!(table.recount_entries().unwrap(), 3);
    }

    #[test]
    fn test_corrupt_representation_kind() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("t.tbl");

        let mut table = ColumnarTable::create(&path, 1).unwrap();
        table.append_rows(&[vec![5u32]]).unwrap();

        let mut bytes = fs::read(&path).unwrap();
        bytes[8] = 9;
        fs::write(&path, bytes).unwrap();

        assert!(matches!(
            table.read_all_rows(1),
            Err(TableError::Codec(CodecError::UnsupportedRepresentation(9)))
        ));
    }

    #[test]
    fn test_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("snap.tbl");

        let mut table = ColumnarTable::create(&path, 3).unwrap();
        table.append_rows(&sample_rows()).unwrap();

        let snapshot = table.snapshot().unwrap();
        assert_eq!(snapshot.name, path.display().to_string());
        assert_eq!(snapshot.entry_count, 3);
        assert_eq!(snapshot.column_count, 3);
        assert_eq!(snapshot.rows, sample_rows());

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["rows"][2][1], 8);
    }

    #[test]
    fn test_remove_table() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("doomed.tbl");

        ColumnarTable::create(&path, 1).unwrap();
        ColumnarTable::remove(&path).unwrap();
        assert!(!path.exists());

        assert!(matches!(
            ColumnarTable::remove(&path),
            Err(TableError::NotFound(_))
        ));
    }

    #[test]
    fn test_locked_table_rejects_writer() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("locked.tbl");
        let mut table = ColumnarTable::create(&path, 1).unwrap();

        let fs = crate::vfs::LocalFs::new();
        let reader = crate::vfs::VfsInterface::open_file(&fs, &path, crate::vfs::OpenMode::Read)
            .unwrap();

        assert!(matches!(
            table.append_rows(&[vec![1u32]]),
            Err(TableError::Vfs(VfsError::Locked(_)))
        ));
        drop(reader);

        table.append_rows(&[vec![1u32]]).unwrap();
        assert_eq!(table.entry_count().unwrap(), 1);
    }

    #[test]
    fn test_unlocked_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("free.tbl");
        let config = TableConfig {
            lock_files: false,
            sync_on_write: true,
        };

        let mut table = ColumnarTable::create_with(&path, 2, config).unwrap();
        table.append_rows(&[vec![1u32, 2]]).unwrap();

        let reopened = ColumnarTable::open_with(&path, config).unwrap();
        assert_eq!(reopened.config(), config);
        assert_eq!(reopened.scan_rows().unwrap(), vec![vec![1, 2]]);
    }

    #[test]
    fn test_huge_column_count_reads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("wide.tbl");

        let table = ColumnarTable::create(&path, u32::MAX).unwrap();
        assert!(table.scan_rows().unwrap().is_empty());
        assert!(table.read_all_rows(u32::MAX).unwrap().is_empty());

        let snapshot = ColumnarTable::open(&path).unwrap().snapshot().unwrap();
        assert_eq!(snapshot.column_count, u32::MAX);
        assert!(snapshot.rows.is_empty());
    }

    #[test]
    fn test_discard_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("partial.tbl");

        // A zero-byte leftover blocks creation until it is discarded
        fs::File::create(&path).unwrap();
        assert!(matches!(
            ColumnarTable::create(&path, 2),
            Err(TableError::AlreadyExists(_))
        ));

        discard_partial_file(&LocalFs::new(), &path);
        assert!(!path.exists());
        let table = ColumnarTable::create(&path, 2).unwrap();
        assert_eq!(table.column_count().unwrap(), 2);

        // Nothing to remove is not an error
        discard_partial_file(&LocalFs::new(), &temp_dir.path().join("missing.tbl"));
    }

    #[test]
    fn test_recount_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("gone.tbl");

        let table = ColumnarTable::create(&path, 2).unwrap();
        ColumnarTable::remove(&path).unwrap();
        assert!(matches!(
            table.recount_entries(),
            Err(TableError::NotFound(_))
        ));
    }
}
