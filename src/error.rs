//! Error types for the upscaler library.
//!
//! This module provides the [`Error`] enum and [`Result`] type alias used
//! throughout the crate. Note that drawing a progress frame never produces an
//! [`Error`]: [`ProgressBar::update`](crate::progress::ProgressBar::update)
//! reports frame failures inline and keeps going.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for upscaler operations.
#[derive(Error, Debug)]
pub enum Error {
    /// An I/O error occurred (e.g., writing to terminal, creating the output directory).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A Unix-specific error occurred (e.g., installing the interrupt handler).
    #[cfg(unix)]
    #[error(transparent)]
    Nix(#[from] nix::errno::Errno),

    /// An output name template failed to parse or render.
    #[error(transparent)]
    Tera(#[from] tera::Error),

    /// Decoding or encoding an image failed in the resampling backend.
    #[error(transparent)]
    Image(#[from] image::ImageError),

    /// The OpenCV super-resolution backend reported an error.
    #[cfg(feature = "opencv")]
    #[error(transparent)]
    OpenCv(#[from] opencv::Error),

    /// Walking an input directory failed.
    #[error(transparent)]
    WalkDir(#[from] walkdir::Error),

    /// A bar style index outside the style table was requested.
    #[error("Incorrect index for style: {0}. Enter (0 ~ {max})", max = crate::style::BarStyle::MAX_INDEX)]
    InvalidStyle(usize),

    /// A model preset index outside `1..=4` was requested.
    #[error("Incorrect model selection: {0}. Enter (1 ~ 4)")]
    InvalidPreset(usize),

    /// The answer to the model prompt was not a number.
    #[error("Incorrect model selection: {0:?}. Enter (1 ~ 4)")]
    InvalidSelection(String),

    /// The model file does not exist.
    #[error("model not found: {}", .0.display())]
    ModelNotFound(PathBuf),

    /// The model filename does not follow the `<algorithm>_x<scale>` convention.
    #[error("unrecognized model: {0}")]
    UnrecognizedModel(String),

    /// The requested backend was not compiled in.
    #[error("backend not available in this build: {0} (rebuild with `--features opencv` or use `--backend resample`)")]
    BackendUnavailable(String),

    /// The backend can't decode or encode this file type.
    #[error("unsupported image format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// An input path given on the command line does not exist.
    #[error("provided path does not exist: {}", .0.display())]
    InputNotFound(PathBuf),

    /// Input enumeration produced nothing to process.
    #[error("no images to process")]
    NoInputs,

    /// Processing a single image failed; the batch stops here.
    #[error("something went wrong processing {}: {source}", .path.display())]
    Item {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },
}

/// A specialized `Result` type for upscaler operations.
///
/// This is defined as `std::result::Result<T, upscaler::Error>` for convenience.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wraps `self` as the failure of processing `path`.
    pub fn for_item(self, path: impl Into<PathBuf>) -> Self {
        Error::Item {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_style_names_range() {
        let msg = Error::InvalidStyle(12).to_string();
        assert!(msg.contains("(0 ~ 11)"), "got: {msg}");
    }

    #[test]
    fn test_item_wraps_source() {
        let err = Error::NoInputs.for_item("a/b.png");
        let msg = err.to_string();
        assert!(msg.contains("a/b.png"));
        assert!(msg.contains("no images to process"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
