//! Finding the images to process.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::{Error, Result};

/// File extensions picked up when scanning a directory.
pub const IMAGE_EXTENSIONS: [&str; 8] = ["bmp", "jpeg", "jpg", "jpe", "jp2", "tiff", "tif", "png"];

/// Where the images come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Explicit files, processed in the given order.
    Files(Vec<PathBuf>),
    /// Every image below this directory.
    Dir(PathBuf),
}

/// Whether `path` has one of [`IMAGE_EXTENSIONS`], ignoring case.
pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// Lists image files below `dir`, recursively, sorted by path.
///
/// # Errors
///
/// Returns [`Error::InputNotFound`] if `dir` doesn't exist, or the walk error.
pub fn scan_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Err(Error::InputNotFound(dir.to_path_buf()));
    }
    let mut found = vec![];
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && is_image(entry.path()) {
            found.push(entry.into_path());
        }
    }
    Ok(found)
}

impl InputSource {
    /// Resolves the source into the list of files to process.
    ///
    /// Explicit files are taken as given, without checking their extension;
    /// a file that can't be decoded fails when the batch reaches it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoInputs`] when nothing is left to process.
    pub fn collect(&self) -> Result<Vec<PathBuf>> {
        let files = match self {
            InputSource::Files(files) => files.clone(),
            InputSource::Dir(dir) => scan_dir(dir)?,
        };
        if files.is_empty() {
            return Err(Error::NoInputs);
        }
        Ok(files)
    }
}
