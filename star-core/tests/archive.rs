use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use star_core::format::{BLOCK_SIZE, DIRECTORY_SIZE, PAYLOAD_SIZE};
use star_core::logging::NullLogger;
use star_core::{append, create, delete, extract, list, pack, update};

fn write_input(dir: &std::path::Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// `extract` writes into the process's current directory, which is global
/// state shared by every test thread — serialize access to it instead of
/// racing other tests that also call `extract_into`.
fn cwd_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

fn extract_into(archive: &Path, dest: &Path) {
    let _guard = cwd_lock().lock().unwrap();
    let cwd = std::env::current_dir().unwrap();
    std::env::set_current_dir(dest).unwrap();
    let result = extract(archive, &NullLogger);
    std::env::set_current_dir(cwd).unwrap();
    result.unwrap();
}

#[test]
fn create_then_list_reports_basenames_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_input(dir.path(), "a.txt", b"hello");
    let b = write_input(dir.path(), "b.txt", b"world");
    let archive = dir.path().join("out.tar");

    create(&archive, &[a, b], &NullLogger).unwrap();
    let names = list(&archive, &NullLogger).unwrap();

    assert_eq!(names, vec!["a.txt".to_string(), "b.txt".to_string()]);
}

#[test]
fn create_then_extract_round_trips_file_contents() {
    let dir = tempfile::tempdir().unwrap();
    let payload = b"the quick brown fox jumps over the lazy dog".repeat(1000);
    let input = write_input(dir.path(), "data.bin", &payload);
    let archive = dir.path().join("out.tar");
    create(&archive, &[input], &NullLogger).unwrap();

    let extract_dir = tempfile::tempdir().unwrap();
    extract_into(&archive, extract_dir.path());

    let extracted = fs::read(extract_dir.path().join("data.bin")).unwrap();
    assert_eq!(extracted, payload);
}

#[test]
fn create_spanning_multiple_blocks_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let payload = vec![0xABu8; PAYLOAD_SIZE * 3 + 17];
    let input = write_input(dir.path(), "big.bin", &payload);
    let archive = dir.path().join("out.tar");
    create(&archive, &[input], &NullLogger).unwrap();

    let metadata = fs::metadata(&archive).unwrap();
    assert_eq!(metadata.len(), DIRECTORY_SIZE as u64 + 4 * BLOCK_SIZE as u64);

    let extract_dir = tempfile::tempdir().unwrap();
    extract_into(&archive, extract_dir.path());

    let extracted = fs::read(extract_dir.path().join("big.bin")).unwrap();
    assert_eq!(extracted, payload);
}

#[test]
fn create_with_missing_input_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("out.tar");
    let missing = dir.path().join("does-not-exist.txt");

    let result = create(&archive, &[missing], &NullLogger);
    assert!(result.is_err());
}

#[test]
fn create_with_no_input_files_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("out.tar");

    assert!(create(&archive, &[], &NullLogger).is_err());
}

#[test]
fn delete_frees_blocks_and_compacts_directory() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_input(dir.path(), "a.txt", b"aaaa");
    let b = write_input(dir.path(), "b.txt", b"bbbb");
    let c = write_input(dir.path(), "c.txt", b"cccc");
    let archive = dir.path().join("out.tar");
    create(&archive, &[a, b, c], &NullLogger).unwrap();

    delete(&archive, &["b.txt".to_string()], &NullLogger).unwrap();

    let names = list(&archive, &NullLogger).unwrap();
    assert_eq!(names, vec!["a.txt".to_string(), "c.txt".to_string()]);
}

#[test]
fn deleting_an_unknown_file_does_not_error() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_input(dir.path(), "a.txt", b"aaaa");
    let archive = dir.path().join("out.tar");
    create(&archive, &[a], &NullLogger).unwrap();

    delete(&archive, &["missing.txt".to_string()], &NullLogger).unwrap();

    assert_eq!(list(&archive, &NullLogger).unwrap(), vec!["a.txt".to_string()]);
}

#[test]
fn update_shrink_then_extract_matches_new_content() {
    let dir = tempfile::tempdir().unwrap();
    let big = vec![1u8; PAYLOAD_SIZE * 2 + 5];
    let input = write_input(dir.path(), "f.bin", &big);
    let archive = dir.path().join("out.tar");
    create(&archive, &[input.clone()], &NullLogger).unwrap();

    let small = vec![2u8; 10];
    fs::write(&input, &small).unwrap();
    update(&archive, &[input], &NullLogger).unwrap();

    let extract_dir = tempfile::tempdir().unwrap();
    extract_into(&archive, extract_dir.path());

    let extracted = fs::read(extract_dir.path().join("f.bin")).unwrap();
    assert_eq!(extracted, small);
}

#[test]
fn update_grow_then_extract_matches_new_content() {
    let dir = tempfile::tempdir().unwrap();
    let small = vec![3u8; 10];
    let input = write_input(dir.path(), "f.bin", &small);
    let archive = dir.path().join("out.tar");
    create(&archive, &[input.clone()], &NullLogger).unwrap();

    let big = vec![4u8; PAYLOAD_SIZE * 2 + 5];
    fs::write(&input, &big).unwrap();
    update(&archive, &[input], &NullLogger).unwrap();

    let extract_dir = tempfile::tempdir().unwrap();
    extract_into(&archive, extract_dir.path());

    let extracted = fs::read(extract_dir.path().join("f.bin")).unwrap();
    assert_eq!(extracted, big);
}

#[test]
fn update_of_unknown_file_does_not_error() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_input(dir.path(), "a.txt", b"aaaa");
    let archive = dir.path().join("out.tar");
    create(&archive, &[a], &NullLogger).unwrap();

    let stray = write_input(dir.path(), "stray.txt", b"zzzz");
    update(&archive, &[stray], &NullLogger).unwrap();

    assert_eq!(list(&archive, &NullLogger).unwrap(), vec!["a.txt".to_string()]);
}

#[test]
fn append_adds_a_file_without_disturbing_existing_ones() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_input(dir.path(), "a.txt", b"aaaa");
    let archive = dir.path().join("out.tar");
    create(&archive, &[a], &NullLogger).unwrap();

    let b = write_input(dir.path(), "b.txt", b"bbbb");
    append(&archive, &[b], &NullLogger).unwrap();

    let names = list(&archive, &NullLogger).unwrap();
    assert_eq!(names, vec!["a.txt".to_string(), "b.txt".to_string()]);

    let extract_dir = tempfile::tempdir().unwrap();
    extract_into(&archive, extract_dir.path());
    assert_eq!(fs::read(extract_dir.path().join("a.txt")).unwrap(), b"aaaa");
    assert_eq!(fs::read(extract_dir.path().join("b.txt")).unwrap(), b"bbbb");
}

#[test]
fn append_reuses_slot_freed_by_delete() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_input(dir.path(), "a.txt", b"aaaa");
    let b = write_input(dir.path(), "b.txt", b"bbbb");
    let archive = dir.path().join("out.tar");
    create(&archive, &[a, b], &NullLogger).unwrap();

    delete(&archive, &["a.txt".to_string()], &NullLogger).unwrap();

    let c = write_input(dir.path(), "c.txt", b"cccc");
    append(&archive, &[c], &NullLogger).unwrap();

    assert_eq!(list(&archive, &NullLogger).unwrap(), vec!["b.txt".to_string(), "c.txt".to_string()]);
}

#[test]
fn pack_shrinks_archive_after_deleting_a_large_file() {
    let dir = tempfile::tempdir().unwrap();
    let small = write_input(dir.path(), "small.txt", b"tiny");
    let big_contents = vec![9u8; PAYLOAD_SIZE * 4];
    let big = write_input(dir.path(), "big.bin", &big_contents);
    let archive = dir.path().join("out.tar");
    create(&archive, &[small, big], &NullLogger).unwrap();

    delete(&archive, &["big.bin".to_string()], &NullLogger).unwrap();
    let before_pack = fs::metadata(&archive).unwrap().len();

    pack(&archive, &NullLogger).unwrap();
    let after_pack = fs::metadata(&archive).unwrap().len();

    assert!(after_pack < before_pack);
    assert_eq!(after_pack, DIRECTORY_SIZE as u64 + BLOCK_SIZE as u64);

    let names = list(&archive, &NullLogger).unwrap();
    assert_eq!(names, vec!["small.txt".to_string()]);

    let extract_dir = tempfile::tempdir().unwrap();
    extract_into(&archive, extract_dir.path());
    assert_eq!(fs::read(extract_dir.path().join("small.txt")).unwrap(), b"tiny");
}

#[test]
fn delete_of_only_file_frees_its_block_zero_chain() {
    // The first file ever created always lands at block 0, which is a
    // legitimate chain head — not the "no chain" sentinel used by a
    // block's own `next` field. Deleting it must actually free block 0.
    let dir = tempfile::tempdir().unwrap();
    let a = write_input(dir.path(), "a.txt", b"aaaa");
    let archive = dir.path().join("out.tar");
    create(&archive, &[a], &NullLogger).unwrap();

    delete(&archive, &["a.txt".to_string()], &NullLogger).unwrap();

    let len = fs::metadata(&archive).unwrap().len();
    assert_eq!(len, DIRECTORY_SIZE as u64);
}

#[test]
fn loading_a_truncated_archive_is_corrupt_not_io() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("short.tar");
    fs::write(&archive, vec![0u8; 100]).unwrap();

    let err = list(&archive, &NullLogger).unwrap_err();
    assert!(matches!(err, star_core::StarError::CorruptArchive { .. }));
}

#[test]
fn append_more_than_max_files_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_input(dir.path(), "a.txt", b"aaaa");
    let archive = dir.path().join("out.tar");
    create(&archive, &[a], &NullLogger).unwrap();

    let too_many: Vec<PathBuf> = (0..star_core::MAX_FILES + 1).map(|i| PathBuf::from(format!("f{i}.txt"))).collect();
    let err = append(&archive, &too_many, &NullLogger).unwrap_err();
    assert!(matches!(err, star_core::StarError::CapacityExceeded { max } if max == star_core::MAX_FILES));
}

#[test]
fn pack_preserves_multi_block_chains_in_new_positions() {
    let dir = tempfile::tempdir().unwrap();
    let a_contents = vec![1u8; PAYLOAD_SIZE * 3];
    let a = write_input(dir.path(), "a.bin", &a_contents);
    let doomed = write_input(dir.path(), "doomed.bin", &vec![2u8; PAYLOAD_SIZE]);
    let b_contents = vec![3u8; PAYLOAD_SIZE * 2 + 9];
    let b = write_input(dir.path(), "b.bin", &b_contents);
    let archive = dir.path().join("out.tar");
    create(&archive, &[a, doomed, b], &NullLogger).unwrap();

    delete(&archive, &["doomed.bin".to_string()], &NullLogger).unwrap();
    pack(&archive, &NullLogger).unwrap();

    let extract_dir = tempfile::tempdir().unwrap();
    extract_into(&archive, extract_dir.path());
    assert_eq!(fs::read(extract_dir.path().join("a.bin")).unwrap(), a_contents);
    assert_eq!(fs::read(extract_dir.path().join("b.bin")).unwrap(), b_contents);
}
