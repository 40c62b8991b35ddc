/*!
 * Tests for file utility functions
 */

use lyricsync::file_utils::FileManager;

use crate::common::{create_temp_dir, create_test_file};

#[test]
fn test_fileExists_withFileAndDir_shouldOnlyAcceptFiles() {
    let dir = create_temp_dir().unwrap();
    let file = create_test_file(dir.path(), "song.lrc", "[00:01.00]a").unwrap();

    assert!(FileManager::file_exists(&file));
    assert!(!FileManager::file_exists(dir.path()));
    assert!(!FileManager::file_exists(dir.path().join("missing.lrc")));
}

#[test]
fn test_ensureDir_nested_shouldCreateAll() {
    let dir = create_temp_dir().unwrap();
    let nested = dir.path().join("x").join("y");

    FileManager::ensure_dir(&nested).unwrap();
    assert!(nested.is_dir());
    FileManager::ensure_dir(&nested).unwrap();
}

#[test]
fn test_readToString_missingFile_shouldNameThePath() {
    let dir = create_temp_dir().unwrap();
    let missing = dir.path().join("missing.lrc");

    let error = FileManager::read_to_string(&missing).unwrap_err();
    assert!(error.to_string().contains("missing.lrc"));
}

#[test]
fn test_writeToFile_existingFile_shouldOverwrite() {
    let dir = create_temp_dir().unwrap();
    let path = create_test_file(dir.path(), "out.lrc", "old").unwrap();

    FileManager::write_to_file(&path, "new").unwrap();
    assert_eq!(FileManager::read_to_string(&path).unwrap(), "new");
}
