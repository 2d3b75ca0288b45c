use fontsynth_infra_storage_fs::FsScratchStorage;
use fontsynth_ports::storage::{ScratchStoragePort, StorageError};
use pretty_assertions::assert_eq;

#[test]
fn creates_directory_on_demand_and_writes_bytes() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = temp.path().join("nested").join("banks");
    let storage = FsScratchStorage::new(dir.clone());

    assert!(!dir.exists());
    storage.ensure_scratch_dir().expect("ensure dir");
    assert!(dir.is_dir());

    let path = storage
        .write_file("piano-abc.sf2", b"RIFF1234")
        .expect("write should succeed");
    assert_eq!(path, dir.join("piano-abc.sf2"));
    assert_eq!(std::fs::read(&path).expect("read back"), b"RIFF1234".to_vec());
}

#[test]
fn ensure_dir_fails_when_a_file_blocks_the_path() {
    let temp = tempfile::tempdir().expect("tempdir");
    let blocker = temp.path().join("blocker");
    std::fs::write(&blocker, b"not a dir").expect("write blocker");

    let storage = FsScratchStorage::new(blocker.join("banks"));
    let err = storage.ensure_scratch_dir().unwrap_err();
    assert!(matches!(err, StorageError::Unavailable(_)));
}

#[test]
fn rejects_file_names_that_escape_the_directory() {
    let temp = tempfile::tempdir().expect("tempdir");
    let storage = FsScratchStorage::new(temp.path().to_path_buf());

    for name in ["../escape.sf2", "sub/dir.sf2", ".."] {
        let err = storage.write_file(name, b"x").unwrap_err();
        assert!(matches!(err, StorageError::WriteFailed(_)), "{name}");
    }
}

#[test]
fn remove_tolerates_missing_files() {
    let temp = tempfile::tempdir().expect("tempdir");
    let storage = FsScratchStorage::new(temp.path().to_path_buf());

    let path = storage.write_file("gone.sf2", b"data").expect("write");
    storage.remove_file(&path).expect("first remove");
    assert!(!path.exists());
    storage.remove_file(&path).expect("second remove is a no-op");
}

#[test]
fn default_dir_ends_with_requested_name() {
    let dir = FsScratchStorage::default_base_dir("FontSynthTest");
    assert_eq!(dir.file_name().and_then(|n| n.to_str()), Some("FontSynthTest"));
}

#[test]
fn failed_write_leaves_no_file_behind() {
    let temp = tempfile::tempdir().expect("tempdir");
    let storage = FsScratchStorage::new(temp.path().to_path_buf());
    // a directory already holds the target name, so the final rename fails
    let taken = temp.path().join("taken.sf2");
    std::fs::create_dir(&taken).expect("create dir");
    std::fs::write(taken.join("inner"), b"keep").expect("write inner");

    let err = storage.write_file("taken.sf2", b"RIFF-data").unwrap_err();
    assert!(matches!(err, StorageError::WriteFailed(_)));

    let mut entries: Vec<String> = std::fs::read_dir(temp.path())
        .expect("read dir")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    entries.sort();
    assert_eq!(entries, vec!["taken.sf2".to_string()]);
    assert!(taken.is_dir());
}

#[test]
fn rewriting_a_name_replaces_the_content() {
    let temp = tempfile::tempdir().expect("tempdir");
    let storage = FsScratchStorage::new(temp.path().to_path_buf());

    storage.write_file("bank.sf2", b"first-longer").expect("first write");
    let path = storage.write_file("bank.sf2", b"second").expect("second write");

    assert_eq!(std::fs::read(&path).expect("read"), b"second".to_vec());
    assert_eq!(std::fs::read_dir(temp.path()).expect("read dir").count(), 1);
}
