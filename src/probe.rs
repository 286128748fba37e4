use crate::meta;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Width reported when a directory has no qualifying images; large enough to
/// never bind as a resize target.
pub const SENTINEL_WIDTH: u32 = 10_000_000;

/// The normalization target for one directory's conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSpec {
    pub width: u32,
    pub dpi: u32,
}

/// Derive the target width/DPI for one captured file list.
///
/// Width is the minimum observed pixel width, DPI the maximum observed tag
/// (missing metadata counts as 0); a configured value fixes that axis and
/// skips its scan. With both axes fixed nothing is read from disk.
pub fn derive_target(
    files: &[PathBuf],
    fixed_width: Option<u32>,
    fixed_dpi: Option<u32>,
) -> Result<TargetSpec> {
    if let (Some(width), Some(dpi)) = (fixed_width, fixed_dpi) {
        return Ok(TargetSpec { width, dpi });
    }

    let mut min_width = SENTINEL_WIDTH;
    let mut max_dpi = 0u32;

    for file in files {
        let m = meta::read(file)?;
        if fixed_width.is_none() {
            min_width = min_width.min(m.width);
        }
        if fixed_dpi.is_none() {
            max_dpi = max_dpi.max(m.dpi);
        }
    }

    Ok(TargetSpec {
        width: fixed_width.unwrap_or(min_width),
        dpi: fixed_dpi.unwrap_or(max_dpi),
    })
}
