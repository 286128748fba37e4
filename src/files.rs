use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// The two recognized raster suffixes, matched literally and case-sensitively.
const SUFFIXES: [&str; 2] = [".jpg", ".png"];

pub fn is_qualifying(path: &Path) -> bool {
    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => SUFFIXES.iter().any(|s| name.ends_with(s)),
        None => false,
    }
}

/// Qualifying direct children of `dir`, in enumeration order (filesystem-defined,
/// not sorted). Captured once per directory pass and threaded through every
/// stage so the listing cannot drift between probe and assembly.
pub fn qualifying_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))? {
        let entry = entry.with_context(|| format!("read dir {}", dir.display()))?;
        let kind = entry
            .file_type()
            .with_context(|| format!("stat {}", entry.path().display()))?;
        let path = entry.path();
        if kind.is_file() && is_qualifying(&path) {
            files.push(path);
        }
    }
    Ok(files)
}
