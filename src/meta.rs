//! Raster metadata: pixel dimensions plus the DPI tag (PNG pHYs chunk,
//! JPEG JFIF density). DPI is 0 when the source carries no density metadata.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Cursor};
use std::path::Path;

const METERS_PER_INCH: f64 = 0.0254;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMeta {
    pub width: u32,
    pub height: u32,
    pub dpi: u32,
}

/// Read dimensions and DPI without decoding pixel data.
pub fn read(path: &Path) -> Result<ImageMeta> {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    if name.ends_with(".png") {
        read_png(path)
    } else {
        read_jpeg(path)
    }
}

fn read_png(path: &Path) -> Result<ImageMeta> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let decoder = png::Decoder::new(file);
    let reader = decoder
        .read_info()
        .with_context(|| format!("decode png header {}", path.display()))?;
    let info = reader.info();
    let dpi = match info.pixel_dims {
        Some(d) if d.unit == png::Unit::Meter => ppm_to_dpi(d.xppu),
        _ => 0,
    };
    Ok(ImageMeta {
        width: info.width,
        height: info.height,
        dpi,
    })
}

fn read_jpeg(path: &Path) -> Result<ImageMeta> {
    let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let (width, height) = image::ImageReader::new(Cursor::new(bytes.as_slice()))
        .with_guessed_format()
        .with_context(|| format!("sniff {}", path.display()))?
        .into_dimensions()
        .with_context(|| format!("decode header {}", path.display()))?;
    Ok(ImageMeta {
        width,
        height,
        dpi: jfif_density(&bytes),
    })
}

/// DPI from a JFIF APP0 segment. 0 when absent or when the density unit is
/// "aspect ratio only".
fn jfif_density(bytes: &[u8]) -> u32 {
    if bytes.len() < 4 || bytes[0..2] != [0xFF, 0xD8] {
        return 0;
    }
    let mut i = 2;
    while i + 4 <= bytes.len() {
        if bytes[i] != 0xFF {
            return 0;
        }
        let marker = bytes[i + 1];
        // RST/SOI/EOI markers carry no length word
        if (0xD0..=0xD9).contains(&marker) {
            i += 2;
            continue;
        }
        let len = u16::from_be_bytes([bytes[i + 2], bytes[i + 3]]) as usize;
        if marker == 0xE0 && len >= 14 && i + 14 <= bytes.len() && bytes[i + 4..i + 9] == *b"JFIF\0" {
            let units = bytes[i + 11];
            let x = u16::from_be_bytes([bytes[i + 12], bytes[i + 13]]) as u32;
            return match units {
                1 => x,
                2 => (x as f64 * 2.54).round() as u32,
                _ => 0,
            };
        }
        if marker == 0xDA {
            // start of scan; no metadata past this point
            break;
        }
        i += 2 + len;
    }
    0
}

/// Write an RGB JPEG, tagging the JFIF density when `dpi` is nonzero.
pub fn write_jpeg(path: &Path, image: &image::RgbImage, dpi: u32, quality: u8) -> Result<()> {
    let (w, h) = image.dimensions();
    let mut bytes = Vec::new();
    let mut encoder = jpeg_encoder::Encoder::new(&mut bytes, quality);
    encoder.set_sampling_factor(jpeg_encoder::SamplingFactor::R_4_2_0);
    if dpi > 0 {
        encoder.set_density(jpeg_encoder::Density::Inch {
            x: dpi as u16,
            y: dpi as u16,
        });
    }
    encoder
        .encode(image.as_raw(), w as u16, h as u16, jpeg_encoder::ColorType::Rgb)
        .with_context(|| format!("encode jpeg {}", path.display()))?;
    std::fs::write(path, bytes).with_context(|| format!("write {}", path.display()))
}

/// Write a PNG, tagging a pHYs chunk when `dpi` is nonzero. An alpha channel
/// in the source is preserved; everything else is written as RGB.
pub fn write_png(path: &Path, image: &image::DynamicImage, dpi: u32) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), image.width(), image.height());
    encoder.set_depth(png::BitDepth::Eight);
    if dpi > 0 {
        let ppm = dpi_to_ppm(dpi);
        encoder.set_pixel_dims(Some(png::PixelDimensions {
            xppu: ppm,
            yppu: ppm,
            unit: png::Unit::Meter,
        }));
    }
    let data = if image.color().has_alpha() {
        encoder.set_color(png::ColorType::Rgba);
        image.to_rgba8().into_raw()
    } else {
        encoder.set_color(png::ColorType::Rgb);
        image.to_rgb8().into_raw()
    };
    let mut writer = encoder
        .write_header()
        .with_context(|| format!("write png header {}", path.display()))?;
    writer
        .write_image_data(&data)
        .with_context(|| format!("write png {}", path.display()))?;
    writer
        .finish()
        .with_context(|| format!("finish png {}", path.display()))
}

fn ppm_to_dpi(ppm: u32) -> u32 {
    (ppm as f64 * METERS_PER_INCH).round() as u32
}

fn dpi_to_ppm(dpi: u32) -> u32 {
    (dpi as f64 / METERS_PER_INCH).round() as u32
}
