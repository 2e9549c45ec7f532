//! The sequential upscaling loop.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::progress::{ProgressBar, ProgressBarBuilder};
use crate::{Error, Result};

use super::backend::Upsampler;
use super::model::ModelSpec;
use super::naming::OutputNamer;

/// Settings of one batch run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub bar_width: usize,
    pub bar_style: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            bar_width: 50,
            bar_style: 3,
        }
    }
}

/// What one processed image turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upscaled {
    pub input: PathBuf,
    pub output: PathBuf,
    pub before: (u32, u32),
    pub after: (u32, u32),
}

/// Result of a completed batch.
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub items: Vec<Upscaled>,
    /// Time spent inside the backend's `upsample`.
    pub upsample_time: Duration,
    pub elapsed: Duration,
}

/// Upscales a list of images one after the other with a single backend.
pub struct Batch<'a, U: Upsampler> {
    backend: &'a mut U,
    model: &'a ModelSpec,
    namer: &'a OutputNamer,
    config: BatchConfig,
}

impl<'a, U: Upsampler> Batch<'a, U> {
    pub fn new(backend: &'a mut U, model: &'a ModelSpec, namer: &'a OutputNamer) -> Self {
        Self {
            backend,
            model,
            namer,
            config: BatchConfig::default(),
        }
    }

    pub fn config(mut self, config: BatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Processes the [`supported`](Batch::supported) part of `inputs` with a
    /// progress bar on stderr.
    ///
    /// # Errors
    ///
    /// Stops at the first image that fails and returns [`Error::Item`] for it.
    /// Outputs written before that are kept.
    pub fn run(self, inputs: &[PathBuf]) -> Result<BatchSummary> {
        let inputs = self.supported(inputs)?;
        let bar = ProgressBarBuilder::new(inputs.len())
            .width(self.config.bar_width)
            .style(self.config.bar_style)
            .build()?;
        self.run_with_bar(&inputs, bar)
    }

    /// The inputs the backend can handle. Every skipped file is logged as a warning.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoInputs`] if none are left.
    pub fn supported(&self, inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let kept: Vec<PathBuf> = inputs
            .iter()
            .filter(|input| {
                let ok = self.backend.supports(input);
                if !ok {
                    log::warn!(
                        "skipping {}: the {} backend can't handle this format",
                        input.display(),
                        self.backend.name()
                    );
                }
                ok
            })
            .cloned()
            .collect();
        if kept.is_empty() {
            return Err(Error::NoInputs);
        }
        Ok(kept)
    }

    /// Processes `inputs`, drawing progress into `bar`.
    pub fn run_with_bar<W: Write>(
        mut self,
        inputs: &[PathBuf],
        mut bar: ProgressBar<W>,
    ) -> Result<BatchSummary> {
        let start = Instant::now();
        let mut summary = BatchSummary::default();

        for (i, input) in inputs.iter().enumerate() {
            match self.process(i, input, &mut bar) {
                Ok((item, took)) => {
                    summary.upsample_time += took;
                    summary.items.push(item);
                }
                Err(err) => {
                    bar.abandon();
                    return Err(err.for_item(input));
                }
            }
        }
        bar.finish();

        summary.elapsed = start.elapsed();
        Ok(summary)
    }

    fn process<W: Write>(
        &mut self,
        index: usize,
        input: &Path,
        bar: &mut ProgressBar<W>,
    ) -> Result<(Upscaled, Duration)> {
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        log::info!("Processing {name}");

        let image = self.backend.read(input)?;
        let before = self.backend.dimensions(&image);

        let t1 = Instant::now();
        bar.update(index);
        let enlarged = self.backend.upsample(&image)?;
        let took = t1.elapsed();

        let after = self.backend.dimensions(&enlarged);
        log::info!(
            "(w, h): ({}, {}) -> ({}, {})",
            before.0,
            before.1,
            after.0,
            after.1
        );
        log::info!("Time Elapsed: {:.6} seconds", took.as_secs_f64());

        let output = self.namer.output_path(input, index, self.model)?;
        if let Some(dir) = output.parent() {
            fs::create_dir_all(dir)?;
        }
        self.backend.write(&output, &enlarged)?;
        log::debug!("wrote {}", output.display());

        Ok((
            Upscaled {
                input: input.to_path_buf(),
                output,
                before,
                after,
            },
            took,
        ))
    }
}
