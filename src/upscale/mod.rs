//! Batch image upscaling.
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use upscaler::upscale::{Batch, InputSource, ModelSpec, OutputNamer, Resample};
//!
//! let model = ModelSpec::load("models/FSRCNN_x3.pb")?;
//! let inputs = InputSource::Dir(PathBuf::from("photos")).collect()?;
//! let namer = OutputNamer::with_default_template("output")?;
//! let mut backend = Resample::for_model(&model);
//! let summary = Batch::new(&mut backend, &model, &namer).run(&inputs)?;
//! println!("{} images", summary.items.len());
//! # Ok::<(), upscaler::Error>(())
//! ```

mod backend;
mod batch;
#[cfg(feature = "opencv")]
mod dnn;
mod inputs;
mod model;
mod naming;

pub use backend::{Resample, Upsampler, format_for};
pub use batch::{Batch, BatchConfig, BatchSummary, Upscaled};
#[cfg(feature = "opencv")]
pub use dnn::DnnSuperRes;
pub use inputs::{IMAGE_EXTENSIONS, InputSource, is_image, scan_dir};
pub use model::{Algorithm, ModelSpec, Preset};
pub use naming::{DEFAULT_TEMPLATE, OutputNamer};
