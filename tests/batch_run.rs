//! End-to-end batch runs with the resampling backend on real image files.

use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageFormat, ImageReader, Rgb, RgbImage};
use upscaler::Error;
use upscaler::progress::{ProgressBar, ProgressBarBuilder, ProgressOutput};
use upscaler::upscale::{Batch, InputSource, ModelSpec, OutputNamer, Resample};

fn write_image(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x * 40) as u8, (y * 40) as u8, 128]));
    img.save(path).unwrap();
}

fn text_bar(total: usize) -> ProgressBar<Vec<u8>> {
    ProgressBarBuilder::new(total)
        .output(ProgressOutput::Text)
        .build_with_writer(Vec::new())
        .unwrap()
}

fn dimensions(path: &Path) -> (u32, u32) {
    ImageReader::open(path)
        .unwrap()
        .with_guessed_format()
        .unwrap()
        .into_dimensions()
        .unwrap()
}

#[test]
fn test_directory_batch_scales_every_image() {
    let dir = tempfile::tempdir().unwrap();
    let photos = dir.path().join("photos");
    fs::create_dir_all(photos.join("nested")).unwrap();
    write_image(&photos.join("a.png"), 4, 3);
    write_image(&photos.join("nested").join("b.bmp"), 2, 2);
    fs::write(photos.join("notes.txt"), "not an image").unwrap();

    let inputs = InputSource::Dir(photos.clone()).collect().unwrap();
    assert_eq!(inputs.len(), 2);

    let model = ModelSpec::from_path("FSRCNN_x3.pb").unwrap();
    let out = dir.path().join("output");
    let namer = OutputNamer::with_default_template(&out).unwrap();
    let mut backend = Resample::for_model(&model);

    let summary = Batch::new(&mut backend, &model, &namer)
        .run_with_bar(&inputs, text_bar(inputs.len()))
        .unwrap();

    assert_eq!(summary.items.len(), 2);
    assert_eq!(dimensions(&out.join("a_upscaled.png")), (12, 9));
    assert_eq!(dimensions(&out.join("b_upscaled.bmp")), (6, 6));
    let a = summary
        .items
        .iter()
        .find(|item| item.input.ends_with("a.png"))
        .unwrap();
    assert_eq!(a.before, (4, 3));
    assert_eq!(a.after, (12, 9));
}

#[test]
fn test_jpe_files_are_upscaled_and_jp2_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let photos = dir.path().join("photos");
    fs::create_dir_all(&photos).unwrap();
    let img = RgbImage::from_fn(4, 4, |x, _| Rgb([(x * 60) as u8, 10, 200]));
    img.save_with_format(photos.join("a.jpe"), ImageFormat::Jpeg)
        .unwrap();
    fs::write(photos.join("b.jp2"), b"\0\0\0\x0cjP  \r\n").unwrap();

    let scanned = InputSource::Dir(photos.clone()).collect().unwrap();
    assert_eq!(scanned.len(), 2);

    let model = ModelSpec::from_path("FSRCNN_x3.pb").unwrap();
    let out = dir.path().join("output");
    let namer = OutputNamer::with_default_template(&out).unwrap();
    let mut backend = Resample::for_model(&model);

    let batch = Batch::new(&mut backend, &model, &namer);
    let inputs = batch.supported(&scanned).unwrap();
    assert_eq!(inputs, vec![photos.join("a.jpe")]);

    let summary = batch
        .run_with_bar(&inputs, text_bar(inputs.len()))
        .unwrap();
    assert_eq!(summary.items.len(), 1);
    assert_eq!(dimensions(&out.join("a_upscaled.jpe")), (12, 12));
}

#[test]
fn test_only_unsupported_inputs_is_an_error() {
    let model = ModelSpec::from_path("ESPCN_x4.pb").unwrap();
    let namer = OutputNamer::with_default_template("unused").unwrap();
    let mut backend = Resample::for_model(&model);
    let batch = Batch::new(&mut backend, &model, &namer);
    let err = batch.supported(&[PathBuf::from("scan.jp2")]).unwrap_err();
    assert!(matches!(err, Error::NoInputs));
}

#[test]
fn test_custom_template_names_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("cat.png");
    write_image(&input, 2, 2);

    let model = ModelSpec::from_path("ESPCN_x4.pb").unwrap();
    let namer = OutputNamer::new(
        dir.path().join("big"),
        "{{ index }}-{{ stem }}_{{ algorithm }}x{{ scale }}.{{ ext }}",
    )
    .unwrap();
    let mut backend = Resample::for_model(&model);
    let inputs = vec![input];

    let summary = Batch::new(&mut backend, &model, &namer)
        .run_with_bar(&inputs, text_bar(1))
        .unwrap();

    let expected = dir.path().join("big").join("0-cat_espcnx4.png");
    assert_eq!(summary.items[0].output, expected);
    assert_eq!(dimensions(&expected), (8, 8));
}

#[test]
fn test_unreadable_image_stops_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.png");
    let bad = dir.path().join("bad.png");
    let after = dir.path().join("after.png");
    write_image(&good, 2, 2);
    fs::write(&bad, b"definitely not a png").unwrap();
    write_image(&after, 2, 2);

    let model = ModelSpec::from_path("LapSRN_x8.pb").unwrap();
    let out = dir.path().join("output");
    let namer = OutputNamer::with_default_template(&out).unwrap();
    let mut backend = Resample::for_model(&model);
    let inputs: Vec<PathBuf> = vec![good, bad.clone(), after];

    let err = Batch::new(&mut backend, &model, &namer)
        .run_with_bar(&inputs, text_bar(inputs.len()))
        .unwrap_err();

    match &err {
        Error::Item { path, .. } => assert_eq!(path, &bad),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("bad.png"));
    assert_eq!(dimensions(&out.join("good_upscaled.png")), (16, 16));
    assert!(!out.join("after_upscaled.png").exists());
}

#[test]
fn test_input_sources_resolve() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    let err = InputSource::Dir(missing.clone()).collect().unwrap_err();
    assert!(matches!(err, Error::InputNotFound(path) if path == missing));

    let empty = tempfile::tempdir().unwrap();
    let err = InputSource::Dir(empty.path().to_path_buf())
        .collect()
        .unwrap_err();
    assert!(matches!(err, Error::NoInputs));

    // explicit files keep their order and are only checked when read
    let files = vec![PathBuf::from("z.png"), PathBuf::from("a.txt")];
    assert_eq!(InputSource::Files(files.clone()).collect().unwrap(), files);
}
