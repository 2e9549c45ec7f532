//! The boundary to whatever actually enlarges the pixels.

use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};

use super::model::ModelSpec;
use crate::{Error, Result};

/// An image upscaling backend.
///
/// The batch loop only ever reads an image, hands it to [`upsample`](Upsampler::upsample)
/// and writes the result, so a backend is free to pick its own in-memory
/// image representation.
pub trait Upsampler {
    type Image;

    /// Short name for log messages.
    fn name(&self) -> &str;

    /// Whether this backend can read and write files like `path`.
    fn supports(&self, _path: &Path) -> bool {
        true
    }

    fn read(&self, path: &Path) -> Result<Self::Image>;

    /// Enlarges `image`. Deterministic; may take seconds for large inputs.
    fn upsample(&mut self, image: &Self::Image) -> Result<Self::Image>;

    fn write(&self, path: &Path, image: &Self::Image) -> Result<()>;

    /// `(width, height)` in pixels.
    fn dimensions(&self, image: &Self::Image) -> (u32, u32);
}

/// The format a file is written in, going by its extension.
///
/// `.jpe` is JPEG; extensions the `image` crate has no codec for give `None`.
pub fn format_for(path: &Path) -> Option<ImageFormat> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpe" => Some(ImageFormat::Jpeg),
        ext => ImageFormat::from_extension(ext),
    }
}

/// Enlarges by the model's scale factor with a Catmull-Rom filter.
///
/// Doesn't read the model weights; it only borrows the scale from the model name.
/// Lets the tool run where OpenCV isn't available.
#[derive(Debug, Clone)]
pub struct Resample {
    scale: u32,
    filter: FilterType,
}

impl Resample {
    pub fn new(scale: u32) -> Self {
        Self {
            scale,
            filter: FilterType::CatmullRom,
        }
    }

    pub fn for_model(model: &ModelSpec) -> Self {
        Self::new(model.scale)
    }

    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }
}

impl Upsampler for Resample {
    type Image = DynamicImage;

    fn name(&self) -> &str {
        "resample"
    }

    fn supports(&self, path: &Path) -> bool {
        format_for(path).is_some_and(|f| f.reading_enabled() && f.writing_enabled())
    }

    fn read(&self, path: &Path) -> Result<DynamicImage> {
        // sniff the content; the extension may not name a format the decoder knows
        let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
        Ok(image)
    }

    fn upsample(&mut self, image: &DynamicImage) -> Result<DynamicImage> {
        let width = image.width().saturating_mul(self.scale);
        let height = image.height().saturating_mul(self.scale);
        Ok(image.resize_exact(width, height, self.filter))
    }

    fn write(&self, path: &Path, image: &DynamicImage) -> Result<()> {
        let format = format_for(path).ok_or_else(|| Error::UnsupportedFormat(path.to_path_buf()))?;
        image.save_with_format(path, format)?;
        Ok(())
    }

    fn dimensions(&self, image: &DynamicImage) -> (u32, u32) {
        (image.width(), image.height())
    }
}
