// VFS functionality tests

use super::*;
use std::io::{Read, Seek, SeekFrom, Write};
use tempfile::TempDir;

#[test]
fn test_vfs_create_and_open() {
    let fs = LocalFs::new();
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("test_file.tbl");

    assert!(!path.exists());

    // Create file and write some data
    let mut file = fs.create_file(&path).unwrap();
    assert!(file.is_locked());
    file.write_all(b"Hello, VFS!").unwrap();
    drop(file);

    assert!(path.exists());
    assert_eq!(fs.file_size(&path).unwrap(), 11);

    // Open file for reading
    let mut file = fs.open_file(&path, OpenMode::Read).unwrap();
    let mut read_data = String::new();
    file.read_to_string(&mut read_data).unwrap();
    assert_eq!(read_data, "Hello, VFS!");
}

#[test]
fn test_vfs_create_rejects_existing() {
    let fs = LocalFs::new();
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("existing.tbl");

    let mut file = fs.create_file(&path).unwrap();
    file.write_all(b"keep me").unwrap();
    drop(file);

    let result = fs.create_file(&path);
    assert!(matches!(result, Err(VfsError::AlreadyExists(_))));

    // Existing bytes are untouched
    assert_eq!(std::fs::read(&path).unwrap(), b"keep me");
}

#[test]
fn test_vfs_append_mode() {
    let fs = LocalFs::new();
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("append.tbl");

    let mut file = fs.create_file(&path).unwrap();
    file.write_all(b"Hello").unwrap();
    drop(file);

    // Appends land at the end even after seeking to the start
    let mut file = fs.open_file(&path, OpenMode::Append).unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();
    file.write_all(b", VFS").unwrap();
    drop(file);

    assert_eq!(std::fs::read(&path).unwrap(), b"Hello, VFS");
}

#[test]
fn test_vfs_positioned_write() {
    let fs = LocalFs::new();
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("rw.tbl");

    let mut file = fs.create_file(&path).unwrap();
    file.write_all(b"Hello World").unwrap();
    drop(file);

    let mut file = fs.open_file(&path, OpenMode::ReadWrite).unwrap();
    file.seek(SeekFrom::Start(6)).unwrap();
    file.write_all(b"Earth").unwrap();
    drop(file);

    assert_eq!(std::fs::read(&path).unwrap(), b"Hello Earth");
}

#[test]
fn test_vfs_exclusive_lock_conflict() {
    let fs = LocalFs::new();
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("locked.tbl");

    let writer = fs.create_file(&path).unwrap();

    // A second handle cannot take any lock while the writer holds its lock
    let result = fs.open_file(&path, OpenMode::Read);
    assert!(matches!(result, Err(VfsError::Locked(_))));

    drop(writer);

    // Released on drop
    assert!(fs.open_file(&path, OpenMode::ReadWrite).is_ok());
}

#[test]
fn test_vfs_shared_locks_coexist() {
    let fs = LocalFs::new();
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("shared.tbl");
    drop(fs.create_file(&path).unwrap());

    let reader1 = fs.open_file(&path, OpenMode::Read).unwrap();
    let reader2 = fs.open_file(&path, OpenMode::Read).unwrap();
    assert!(reader1.is_locked());
    assert!(reader2.is_locked());

    let result = fs.open_file(&path, OpenMode::Append);
    assert!(matches!(result, Err(VfsError::Locked(_))));
}

#[test]
fn test_vfs_locking_disabled() {
    let fs = LocalFs::with_locking(false);
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("unlocked.tbl");

    let writer = fs.create_file(&path).unwrap();
    assert!(!writer.is_locked());

    let reader = fs.open_file(&path, OpenMode::Read).unwrap();
    assert!(!reader.is_locked());
}

#[test]
fn test_vfs_remove_file() {
    let fs = LocalFs::new();
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("doomed.tbl");

    drop(fs.create_file(&path).unwrap());
    assert!(path.exists());

    fs.remove_file(&path).unwrap();
    assert!(!path.exists());
}

#[test]
fn test_vfs_error_handling() {
    let fs = LocalFs::new();
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing_dir").join("non_existent_file.tbl");

    // Try to create file in non-existent directory
    assert!(matches!(fs.create_file(&missing), Err(VfsError::NotFound(_))));

    // Try to open non-existent file
    assert!(matches!(
        fs.open_file(&missing, OpenMode::Read),
        Err(VfsError::NotFound(_))
    ));

    // Try to stat and remove non-existent file
    assert!(matches!(fs.file_size(&missing), Err(VfsError::NotFound(_))));
    assert!(matches!(fs.remove_file(&missing), Err(VfsError::NotFound(_))));
}

#[test]
fn test_vfs_error_display() {
    let err = VfsError::AlreadyExists("a.tbl".to_string());
    assert_eq!(err.to_string(), "File already exists: a.tbl");

    let err = VfsError::NotFound("b.tbl".to_string());
    assert_eq!(err.to_string(), "File not found: b.tbl");
}
