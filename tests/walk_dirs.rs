use scanbind::walk::directories;
use std::path::Path;

#[test]
fn root_first_then_all_descendants() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    std::fs::create_dir_all(root.join("a").join("b")).unwrap();
    std::fs::create_dir(root.join("c")).unwrap();
    std::fs::write(root.join("loose.txt"), b"x").unwrap();

    let dirs = directories(root);
    assert_eq!(dirs[0], root);
    assert_eq!(dirs.len(), 4);
    assert!(dirs.contains(&root.join("a")));
    assert!(dirs.contains(&root.join("a").join("b")));
    assert!(dirs.contains(&root.join("c")));
}

#[test]
fn missing_root_yields_nothing() {
    assert!(directories(Path::new("/no/such/tree")).is_empty());
}

#[test]
fn enumeration_is_restartable() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::create_dir(tmp.path().join("only")).unwrap();
    assert_eq!(directories(tmp.path()), directories(tmp.path()));
}
