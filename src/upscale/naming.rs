//! Deriving output file names.

use std::path::{Path, PathBuf};

use tera::{Context, Tera};

use super::model::ModelSpec;
use crate::Result;

/// Produces `<stem>_upscaled.<ext>`.
pub const DEFAULT_TEMPLATE: &str = "{{ stem }}_upscaled{% if ext %}.{{ ext }}{% endif %}";

const TEMPLATE_NAME: &str = "output_name";

/// Renders output file names from a Tera template.
///
/// Available variables: `stem`, `ext` (without the dot, empty if none),
/// `algorithm`, `scale` and `index` (0-based position in the batch).
pub struct OutputNamer {
    tera: Tera,
    dir: PathBuf,
}

impl std::fmt::Debug for OutputNamer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputNamer")
            .field("dir", &self.dir)
            .finish_non_exhaustive()
    }
}

impl OutputNamer {
    /// # Errors
    ///
    /// Returns [`Error::Tera`](crate::Error::Tera) if the template doesn't parse.
    pub fn new(dir: impl Into<PathBuf>, template: &str) -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, template)?;
        Ok(Self {
            tera,
            dir: dir.into(),
        })
    }

    pub fn with_default_template(dir: impl Into<PathBuf>) -> Result<Self> {
        Self::new(dir, DEFAULT_TEMPLATE)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The output path for `input`, the `index`-th image of the batch.
    pub fn output_path(&self, input: &Path, index: usize, model: &ModelSpec) -> Result<PathBuf> {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy())
            .unwrap_or_default();
        let ext = input
            .extension()
            .map(|s| s.to_string_lossy())
            .unwrap_or_default();

        let mut ctx = Context::new();
        ctx.insert("stem", &stem);
        ctx.insert("ext", &ext);
        ctx.insert("algorithm", &model.algorithm.to_string());
        ctx.insert("scale", &model.scale);
        ctx.insert("index", &index);

        let name = self.tera.render(TEMPLATE_NAME, &ctx)?;
        Ok(self.dir.join(name.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> ModelSpec {
        ModelSpec::from_path("models/FSRCNN_x3.pb").unwrap()
    }

    #[test]
    fn test_default_name() {
        let namer = OutputNamer::with_default_template("out").unwrap();
        let path = namer
            .output_path(Path::new("photos/cat.jpg"), 0, &model())
            .unwrap();
        assert_eq!(path, PathBuf::from("out/cat_upscaled.jpg"));
    }

    #[test]
    fn test_dotted_stem_keeps_last_extension() {
        let namer = OutputNamer::with_default_template("out").unwrap();
        let path = namer
            .output_path(Path::new("scan.2024.tiff"), 3, &model())
            .unwrap();
        assert_eq!(path, PathBuf::from("out/scan.2024_upscaled.tiff"));
    }

    #[test]
    fn test_no_extension() {
        let namer = OutputNamer::with_default_template("out").unwrap();
        let path = namer.output_path(Path::new("raw"), 0, &model()).unwrap();
        assert_eq!(path, PathBuf::from("out/raw_upscaled"));
    }

    #[test]
    fn test_custom_template() {
        let namer = OutputNamer::new("out", "{{ index }}-{{ stem }}_{{ algorithm }}_x{{ scale }}.png")
            .unwrap();
        let path = namer.output_path(Path::new("a/b.bmp"), 7, &model()).unwrap();
        assert_eq!(path, PathBuf::from("out/7-b_fsrcnn_x3.png"));
    }

    #[test]
    fn test_invalid_template() {
        let err = OutputNamer::new("out", "{{ stem").unwrap_err();
        assert!(matches!(err, crate::Error::Tera(_)));
    }
}
