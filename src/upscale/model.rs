//! Pretrained super-resolution models and their naming convention.
//!
//! Model files are named `<Algorithm>_x<scale>.<ext>`, e.g. `FSRCNN_x3.pb`.
//! The algorithm part selects the network architecture the backend has to
//! set up, the scale is the enlargement factor the weights were trained for.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Network architectures understood by the super-resolution backend.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum Algorithm {
    Edsr,
    Espcn,
    Fsrcnn,
    Lapsrn,
}

/// The four bundled models, in the order the interactive prompt lists them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumIter, strum::FromRepr)]
#[repr(usize)]
pub enum Preset {
    Edsr4 = 1,
    Espcn4 = 2,
    Fsrcnn3 = 3,
    LapSrn8 = 4,
}

impl Preset {
    /// Looks up a preset by its 1-based menu number.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPreset`] outside `1..=4`.
    pub fn from_index(index: usize) -> Result<Preset> {
        Preset::from_repr(index).ok_or(Error::InvalidPreset(index))
    }

    /// Parses an answer typed at the model prompt.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSelection`] if `answer` isn't a number and
    /// [`Error::InvalidPreset`] if it's out of range.
    pub fn from_answer(answer: &str) -> Result<Preset> {
        let answer = answer.trim();
        let index = answer
            .parse::<usize>()
            .map_err(|_| Error::InvalidSelection(answer.to_string()))?;
        Preset::from_index(index)
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// File name of the model inside the models directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Preset::Edsr4 => "EDSR_x4.pb",
            Preset::Espcn4 => "ESPCN_x4.pb",
            Preset::Fsrcnn3 => "FSRCNN_x3.pb",
            Preset::LapSrn8 => "LapSRN_x8.pb",
        }
    }

    pub fn path_in(self, models_dir: &Path) -> PathBuf {
        models_dir.join(self.file_name())
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.file_name();
        write!(f, "{}", name.strip_suffix(".pb").unwrap_or(name))
    }
}

/// A model file together with what its name says about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSpec {
    pub path: PathBuf,
    pub algorithm: Algorithm,
    pub scale: u32,
}

impl ModelSpec {
    /// Parses algorithm and scale from the file name of `path`.
    ///
    /// The file does not have to exist; see [`ModelSpec::load`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnrecognizedModel`] if the name doesn't look like
    /// `<algorithm>_x<scale>.<ext>` with a known algorithm and a scale of at least 2.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<ModelSpec> {
        let path = path.into();
        let unrecognized = || Error::UnrecognizedModel(path.display().to_string());

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(unrecognized)?;
        let (name, _) = stem.split_once('_').ok_or_else(unrecognized)?;
        let algorithm = name
            .to_lowercase()
            .parse::<Algorithm>()
            .map_err(|_| unrecognized())?;
        let (_, scale) = stem.rsplit_once("_x").ok_or_else(unrecognized)?;
        let scale = scale.parse::<u32>().map_err(|_| unrecognized())?;
        if scale < 2 {
            return Err(unrecognized());
        }

        Ok(ModelSpec {
            path,
            algorithm,
            scale,
        })
    }

    /// Parses the file name and checks that the file exists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModelNotFound`] for a missing file, or the errors of
    /// [`ModelSpec::from_path`].
    pub fn load(path: impl Into<PathBuf>) -> Result<ModelSpec> {
        let spec = ModelSpec::from_path(path)?;
        if !spec.path.is_file() {
            return Err(Error::ModelNotFound(spec.path));
        }
        log::info!("loading model: {}", spec.path.display());
        log::info!("model name: {}\tmodel scale: {}", spec.algorithm, spec.scale);
        Ok(spec)
    }

    /// Resolves a bundled preset inside `models_dir`.
    pub fn preset(preset: Preset, models_dir: &Path) -> Result<ModelSpec> {
        ModelSpec::load(preset.path_in(models_dir))
    }
}
