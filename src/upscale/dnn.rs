//! OpenCV `dnn_superres` backend.

use std::path::Path;

use opencv::core::{Mat, MatTraitConst, Vector};
use opencv::dnn_superres::{DnnSuperResImpl, DnnSuperResImplTrait};
use opencv::imgcodecs::{IMREAD_COLOR, imread, imwrite};

use super::backend::Upsampler;
use super::model::ModelSpec;
use crate::{Error, Result};

/// Runs a pretrained EDSR / ESPCN / FSRCNN / LapSRN network through OpenCV.
pub struct DnnSuperRes {
    sr: DnnSuperResImpl,
    model: ModelSpec,
}

impl DnnSuperRes {
    /// Reads the weights of `model` and configures the network for its algorithm and scale.
    pub fn new(model: &ModelSpec) -> Result<Self> {
        let path = model
            .path
            .to_str()
            .ok_or_else(|| Error::UnrecognizedModel(model.path.display().to_string()))?;
        let algorithm = model.algorithm.to_string();
        let mut sr = DnnSuperResImpl::new(&algorithm, model.scale as i32)?;
        sr.read_model(path)?;
        sr.set_model(&algorithm, model.scale as i32)?;
        Ok(Self {
            sr,
            model: model.clone(),
        })
    }

    pub fn model(&self) -> &ModelSpec {
        &self.model
    }
}

fn path_str(path: &Path) -> Result<&str> {
    path.to_str().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("path is not valid UTF-8: {}", path.display()),
        )
        .into()
    })
}

impl Upsampler for DnnSuperRes {
    type Image = Mat;

    fn name(&self) -> &str {
        "dnn_superres"
    }

    fn read(&self, path: &Path) -> Result<Mat> {
        let image = imread(path_str(path)?, IMREAD_COLOR)?;
        if image.empty() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("could not decode {}", path.display()),
            )
            .into());
        }
        Ok(image)
    }

    fn upsample(&mut self, image: &Mat) -> Result<Mat> {
        let mut out = Mat::default();
        self.sr.upsample(image, &mut out)?;
        Ok(out)
    }

    fn write(&self, path: &Path, image: &Mat) -> Result<()> {
        let written = imwrite(path_str(path)?, image, &Vector::new())?;
        if !written {
            return Err(std::io::Error::other(format!("could not encode {}", path.display())).into());
        }
        Ok(())
    }

    fn dimensions(&self, image: &Mat) -> (u32, u32) {
        (image.cols().max(0) as u32, image.rows().max(0) as u32)
    }
}
