use crate::meta;
use anyhow::{Context, Result};
use image::imageops::FilterType;
use std::path::Path;
use tracing::debug;

/// Resize `path` in place to `target_width` (aspect ratio preserved) and
/// retag its DPI metadata. Returns false without touching the file when it
/// already matches both targets, so a re-run rewrites nothing.
///
/// Not safe to run concurrently on the same file: the original is
/// overwritten at its own path.
pub fn normalize(path: &Path, target_width: u32, target_dpi: u32, jpeg_quality: u8) -> Result<bool> {
    let current = meta::read(path)?;
    if current.width == target_width && current.dpi == target_dpi {
        return Ok(false);
    }

    let img = image::open(path).with_context(|| format!("decode {}", path.display()))?;
    let new_height = ((target_width as f64 / current.width as f64) * current.height as f64)
        .round()
        .max(1.0) as u32;
    let resized = img.resize_exact(target_width, new_height, FilterType::Lanczos3);

    debug!(
        "resize {} {}x{} -> {}x{} dpi {}",
        path.display(),
        current.width,
        current.height,
        target_width,
        new_height,
        target_dpi
    );

    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    if name.ends_with(".png") {
        meta::write_png(path, &resized, target_dpi)?;
    } else {
        meta::write_jpeg(path, &resized.to_rgb8(), target_dpi, jpeg_quality)?;
    }
    Ok(true)
}
