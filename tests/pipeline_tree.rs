use scanbind::{
    config::Config,
    meta,
    pipeline::Pipeline,
    report::DirOutcome,
};
use std::path::Path;

fn mk_png(path: &Path, width: u32, height: u32) {
    let file = std::fs::File::create(path).unwrap();
    let mut enc = png::Encoder::new(std::io::BufWriter::new(file), width, height);
    enc.set_color(png::ColorType::Rgb);
    enc.set_depth(png::BitDepth::Eight);
    let mut writer = enc.write_header().unwrap();
    writer
        .write_image_data(&vec![90u8; (width * height * 3) as usize])
        .unwrap();
    writer.finish().unwrap();
}

fn mk_jpg(path: &Path, width: u32, height: u32) {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([10, 10, 10]));
    meta::write_jpeg(path, &img, 0, 90).unwrap();
}

#[test]
fn recursive_coverage_with_bare_root() {
    let root_tmp = tempfile::tempdir().unwrap();
    let out_tmp = tempfile::tempdir().unwrap();
    let root = root_tmp.path();
    let out = out_tmp.path();

    std::fs::create_dir(root.join("sub1")).unwrap();
    std::fs::create_dir(root.join("sub2")).unwrap();
    mk_jpg(&root.join("sub1").join("img.jpg"), 100, 60);
    mk_png(&root.join("sub2").join("img.png"), 80, 40);

    let pipeline = Pipeline::new(&Config::default());
    let report = pipeline.run(root, out, false).unwrap();

    assert_eq!(report.directories.len(), 3);
    assert_eq!(report.directories[0].outcome, DirOutcome::NoImages);
    assert!(out.join("sub1.pdf").exists());
    assert!(out.join("sub2.pdf").exists());

    let root_name = root.file_name().unwrap().to_str().unwrap();
    assert!(!out.join(format!("{root_name}.pdf")).exists());
}

#[test]
fn deletion_gating_keeps_sources_and_directories() {
    let root_tmp = tempfile::tempdir().unwrap();
    let out_tmp = tempfile::tempdir().unwrap();
    let root = root_tmp.path();

    let sub = root.join("only");
    std::fs::create_dir(&sub).unwrap();
    let img = sub.join("img.png");
    mk_png(&img, 64, 64);

    let pipeline = Pipeline::new(&Config::default());
    pipeline.run(root, out_tmp.path(), false).unwrap();

    assert!(img.exists());
    assert!(sub.is_dir());
}

#[test]
fn delete_sources_prunes_emptied_directories() {
    let root_tmp = tempfile::tempdir().unwrap();
    let out_tmp = tempfile::tempdir().unwrap();
    let root = root_tmp.path();
    let out = out_tmp.path();

    let sub = root.join("scans");
    std::fs::create_dir(&sub).unwrap();
    let img = sub.join("img.png");
    mk_png(&img, 64, 32);

    let pipeline = Pipeline::new(&Config::default());
    pipeline.run(root, out, true).unwrap();

    assert!(out.join("scans.pdf").exists());
    assert!(!img.exists());
    // root was processed before the subdirectory emptied, so only the
    // subdirectory is pruned
    assert!(!sub.exists());
    assert!(root.is_dir());
}

#[test]
fn leftover_files_keep_the_directory() {
    let root_tmp = tempfile::tempdir().unwrap();
    let out_tmp = tempfile::tempdir().unwrap();
    let root = root_tmp.path();

    let sub = root.join("mixed");
    std::fs::create_dir(&sub).unwrap();
    mk_png(&sub.join("img.png"), 64, 32);
    std::fs::write(sub.join("notes.txt"), b"keep me").unwrap();

    let pipeline = Pipeline::new(&Config::default());
    pipeline.run(root, out_tmp.path(), true).unwrap();

    assert!(!sub.join("img.png").exists());
    assert!(sub.join("notes.txt").exists());
    assert!(sub.is_dir());
}

#[test]
fn rerun_after_delete_is_a_no_op() {
    let root_tmp = tempfile::tempdir().unwrap();
    let out_tmp = tempfile::tempdir().unwrap();
    let root = root_tmp.path();
    let out = out_tmp.path();

    let sub = root.join("scans");
    std::fs::create_dir(&sub).unwrap();
    mk_png(&sub.join("img.png"), 64, 32);

    let pipeline = Pipeline::new(&Config::default());
    pipeline.run(root, out, true).unwrap();
    let report = pipeline.run(root, out, true).unwrap();

    // only the root remains, and it has nothing to convert
    assert_eq!(report.directories.len(), 1);
    assert_eq!(report.directories[0].outcome, DirOutcome::NoImages);
    // prior output is untouched
    assert!(out.join("scans.pdf").exists());
}

#[test]
fn empty_directory_is_a_terminal_no_op() {
    let dir_tmp = tempfile::tempdir().unwrap();
    let out_tmp = tempfile::tempdir().unwrap();

    let pipeline = Pipeline::new(&Config::default());
    let report = pipeline
        .convert_dir(dir_tmp.path(), out_tmp.path(), true)
        .unwrap();

    assert_eq!(report.outcome, DirOutcome::NoImages);
    assert!(report.pdf.is_none());
    // even with deletion enabled the directory itself is untouched
    assert!(dir_tmp.path().is_dir());
    assert!(std::fs::read_dir(out_tmp.path()).unwrap().next().is_none());
}

#[test]
fn pages_share_the_directory_minimum_width() {
    let root_tmp = tempfile::tempdir().unwrap();
    let out_tmp = tempfile::tempdir().unwrap();
    let root = root_tmp.path();

    let sub = root.join("book");
    std::fs::create_dir(&sub).unwrap();
    let wide = sub.join("wide.png");
    let narrow = sub.join("narrow.png");
    mk_png(&wide, 120, 60);
    mk_png(&narrow, 80, 40);

    let pipeline = Pipeline::new(&Config::default());
    let report = pipeline.run(root, out_tmp.path(), false).unwrap();

    let book = report
        .directories
        .iter()
        .find(|d| d.outcome == DirOutcome::Converted)
        .unwrap();
    assert_eq!(book.target.unwrap().width, 80);
    assert_eq!(meta::read(&wide).unwrap().width, 80);
    assert_eq!(meta::read(&narrow).unwrap().width, 80);
}
