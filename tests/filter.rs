use scanbind::files::{is_qualifying, qualifying_files};
use std::path::Path;

#[test]
fn suffix_match_is_literal_and_case_sensitive() {
    assert!(is_qualifying(Path::new("a.jpg")));
    assert!(is_qualifying(Path::new("b.png")));
    assert!(!is_qualifying(Path::new("c.JPG")));
    assert!(!is_qualifying(Path::new("d.jpeg")));
    assert!(!is_qualifying(Path::new("e.txt")));
    assert!(!is_qualifying(Path::new("png")));
}

#[test]
fn capture_skips_directories_and_foreign_files() {
    let tmp = tempfile::tempdir().unwrap();
    // a directory with an image-like name must not qualify
    std::fs::create_dir(tmp.path().join("nested.png")).unwrap();
    std::fs::write(tmp.path().join("page.jpg"), b"x").unwrap();
    std::fs::write(tmp.path().join("notes.txt"), b"x").unwrap();

    let files = qualifying_files(tmp.path()).unwrap();
    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with("page.jpg"));
}

#[test]
fn empty_directory_captures_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    assert!(qualifying_files(tmp.path()).unwrap().is_empty());
}
