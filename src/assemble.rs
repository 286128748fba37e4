//! Bind one directory's images into a single multi-page PDF.
//!
//! Each page is the image re-encoded as an RGB JPEG XObject (DCTDecode),
//! drawn full-bleed on a page whose size maps pixels at the fixed output
//! resolution of 100 (page points = pixels * 72 / 100, independent of the
//! normalization DPI).

use crate::util::ensure_dir;
use anyhow::{anyhow, Context, Result};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream};
use std::path::{Path, PathBuf};
use tracing::debug;

const OUTPUT_RESOLUTION: f32 = 100.0;

/// Write `<out_dir>/<dir basename>.pdf` with one page per file, in list
/// order. Read-only with respect to the sources; overwrites any prior PDF
/// at the same path.
pub fn assemble(dir: &Path, files: &[PathBuf], out_dir: &Path, jpeg_quality: u8) -> Result<PathBuf> {
    let name = dir
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("directory has no basename: {}", dir.display()))?;

    ensure_dir(out_dir)?;
    let out_path = out_dir.join(format!("{name}.pdf"));

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut page_ids = Vec::with_capacity(files.len());

    for (index, file) in files.iter().enumerate() {
        let image_name = format!("Im{index}");
        let img = image::open(file).with_context(|| format!("decode {}", file.display()))?;
        // one shared color model per document: flatten alpha/palette to RGB
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();

        let mut jpeg = Vec::new();
        let mut encoder = jpeg_encoder::Encoder::new(&mut jpeg, jpeg_quality);
        encoder.set_sampling_factor(jpeg_encoder::SamplingFactor::R_4_2_0);
        encoder
            .encode(
                rgb.as_raw(),
                width as u16,
                height as u16,
                jpeg_encoder::ColorType::Rgb,
            )
            .with_context(|| format!("encode page {}", file.display()))?;

        let mut image_dict = Dictionary::new();
        image_dict.set("Type", Object::Name(b"XObject".to_vec()));
        image_dict.set("Subtype", Object::Name(b"Image".to_vec()));
        image_dict.set("Width", Object::Integer(width as i64));
        image_dict.set("Height", Object::Integer(height as i64));
        image_dict.set("ColorSpace", Object::Name(b"DeviceRGB".to_vec()));
        image_dict.set("BitsPerComponent", Object::Integer(8));
        image_dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));
        let image_id = doc.add_object(Stream::new(image_dict, jpeg));

        let page_width = width as f32 * 72.0 / OUTPUT_RESOLUTION;
        let page_height = height as f32 * 72.0 / OUTPUT_RESOLUTION;

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        Object::Real(page_width),
                        Object::Real(0.0),
                        Object::Real(0.0),
                        Object::Real(page_height),
                        Object::Real(0.0),
                        Object::Real(0.0),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(image_name.clone().into_bytes())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            content.encode().context("encode page content stream")?,
        ));

        let mut xobjects = Dictionary::new();
        xobjects.set(image_name, Object::Reference(image_id));
        let mut resources = Dictionary::new();
        resources.set("XObject", Object::Dictionary(xobjects));

        let mut page = Dictionary::new();
        page.set("Type", Object::Name(b"Page".to_vec()));
        page.set("Parent", Object::Reference(pages_id));
        page.set(
            "MediaBox",
            vec![
                Object::Real(0.0),
                Object::Real(0.0),
                Object::Real(page_width),
                Object::Real(page_height),
            ],
        );
        page.set("Resources", Object::Dictionary(resources));
        page.set("Contents", Object::Reference(content_id));
        page_ids.push(doc.add_object(page));

        debug!("page {} from {} ({}x{})", index + 1, file.display(), width, height);
    }

    let mut pages = Dictionary::new();
    pages.set("Type", Object::Name(b"Pages".to_vec()));
    pages.set(
        "Kids",
        page_ids
            .iter()
            .map(|id| Object::Reference(*id))
            .collect::<Vec<_>>(),
    );
    pages.set("Count", Object::Integer(page_ids.len() as i64));
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", catalog_id);

    doc.save(&out_path)
        .with_context(|| format!("write pdf {}", out_path.display()))?;
    Ok(out_path)
}
