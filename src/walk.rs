use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// The directories one batch run visits: the root itself first, then every
/// descendant directory, depth-unbounded, in filesystem order. Pure
/// enumeration — conversion side effects live in the pipeline. A missing or
/// unreadable root yields an empty sequence.
pub fn directories(root: &Path) -> Vec<PathBuf> {
    if !root.is_dir() {
        return Vec::new();
    }
    let mut dirs = vec![root.to_path_buf()];
    for entry in WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_dir() {
            dirs.push(entry.into_path());
        }
    }
    dirs
}
