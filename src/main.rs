use std::io::{BufRead, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, CommandFactory, Parser, ValueEnum, error::ErrorKind};
use console::Term;
use log::LevelFilter;
use strum::IntoEnumIterator;

use upscaler::progress::{install_interrupt_handler, try_init_log_integration_with_level};
use upscaler::style::{self, BarStyle};
use upscaler::upscale::{
    Batch, BatchConfig, BatchSummary, DEFAULT_TEMPLATE, InputSource, ModelSpec, OutputNamer,
    Preset, Resample, Upsampler,
};
use upscaler::{Error, Result};

#[derive(Parser, Debug)]
#[command(
    name = "upscaler",
    version,
    about = "Image Upscaling Tool",
    after_help = "Examples:\n  upscaler -i cat.png dog.jpg -m 3\n  upscaler -d ./photos --model-path ./models/EDSR_x4.pb -o ./big"
)]
struct Cli {
    /// Path to the low-res image(s).
    #[arg(short, long, num_args = 1.., conflicts_with = "img_dir")]
    image: Vec<PathBuf>,

    /// Directory to scan recursively for low-res images.
    #[arg(short = 'd', long = "img-dir", visible_alias = "img_dir")]
    img_dir: Option<PathBuf>,

    /// Bundled model: 1 EDSR_x4, 2 ESPCN_x4, 3 FSRCNN_x3, 4 LapSRN_x8. Asked for when omitted.
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=4), conflicts_with = "model_path")]
    model: Option<u8>,

    /// Model file following the `<algorithm>_x<scale>.pb` naming convention.
    #[arg(long)]
    model_path: Option<PathBuf>,

    /// Directory holding the bundled models [default: models/ next to the executable].
    #[arg(long)]
    models_dir: Option<PathBuf>,

    /// Output directory [default: output/ next to the executable].
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Tera template for output file names (variables: stem, ext, algorithm, scale, index).
    #[arg(long, default_value = DEFAULT_TEMPLATE)]
    name_template: String,

    /// Upscaling backend.
    #[arg(long, value_enum, default_value_t = BackendArg::default())]
    backend: BackendArg,

    /// Width of the progress bar in cells.
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u16).range(1..))]
    bar_width: u16,

    /// Progress bar style (0 ~ 11).
    #[arg(long, default_value_t = 3)]
    style: usize,

    /// Print the available progress bar styles and exit.
    #[arg(long)]
    list_styles: bool,

    /// More output (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only print warnings and errors.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BackendArg {
    /// OpenCV dnn_superres with the pretrained network
    Dnn,
    /// Catmull-Rom resampling by the model's scale factor
    Resample,
}

impl Default for BackendArg {
    fn default() -> Self {
        if cfg!(feature = "opencv") {
            BackendArg::Dnn
        } else {
            BackendArg::Resample
        }
    }
}

impl Cli {
    fn level(&self) -> LevelFilter {
        match (self.quiet, self.verbose) {
            (true, _) => LevelFilter::Warn,
            (false, 0) => LevelFilter::Info,
            (false, 1) => LevelFilter::Debug,
            (false, _) => LevelFilter::Trace,
        }
    }

    fn input_source(&self) -> InputSource {
        match &self.img_dir {
            Some(dir) => InputSource::Dir(dir.clone()),
            None => InputSource::Files(self.image.clone()),
        }
    }
}

/// Directory of the running executable, where `models/` and `output/` live by default.
fn tool_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.canonicalize().ok())
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn prompt_preset() -> Result<Preset> {
    let term = Term::stderr();
    term.write_line("Which upscaling model to use:")?;
    for preset in Preset::iter() {
        term.write_line(&format!("{}. {}", preset.index(), preset))?;
    }
    // `Term::read_line` only reads from a terminal; piped answers come from stdin
    let answer = if std::io::stdin().is_terminal() && term.is_term() {
        term.read_line()?
    } else {
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        line
    };
    Preset::from_answer(&answer)
}

fn resolve_model(cli: &Cli) -> Result<ModelSpec> {
    if let Some(path) = &cli.model_path {
        return ModelSpec::load(path);
    }
    let preset = match cli.model {
        Some(index) => Preset::from_index(index.into())?,
        None => prompt_preset()?,
    };
    let models_dir = cli
        .models_dir
        .clone()
        .unwrap_or_else(|| tool_dir().join("models"));
    ModelSpec::preset(preset, &models_dir)
}

fn run_with<U: Upsampler>(
    backend: &mut U,
    model: &ModelSpec,
    namer: &OutputNamer,
    inputs: &[PathBuf],
    config: BatchConfig,
) -> Result<BatchSummary> {
    log::debug!("backend: {}", backend.name());
    Batch::new(backend, model, namer).config(config).run(inputs)
}

fn run(cli: Cli) -> Result<()> {
    // Fail on a bad style before prompting for anything.
    BarStyle::from_index(cli.style)?;
    let inputs = cli.input_source().collect()?;
    let model = resolve_model(&cli)?;

    let out_dir = cli
        .output
        .clone()
        .unwrap_or_else(|| tool_dir().join("output"));
    let namer = OutputNamer::new(out_dir, &cli.name_template)?;
    let config = BatchConfig {
        bar_width: cli.bar_width.into(),
        bar_style: cli.style,
    };

    let summary = match cli.backend {
        BackendArg::Resample => {
            let mut backend = Resample::for_model(&model);
            run_with(&mut backend, &model, &namer, &inputs, config)?
        }
        #[cfg(feature = "opencv")]
        BackendArg::Dnn => {
            let mut backend = upscaler::upscale::DnnSuperRes::new(&model)?;
            run_with(&mut backend, &model, &namer, &inputs, config)?
        }
        #[cfg(not(feature = "opencv"))]
        BackendArg::Dnn => {
            return Err(Error::BackendUnavailable("dnn".to_string()));
        }
    };

    log::info!(
        "{} {} image(s) in {:.2}s ({:.2}s upsampling) -> {}",
        style::egreen("Upscaled"),
        summary.items.len(),
        summary.elapsed.as_secs_f64(),
        summary.upsample_time.as_secs_f64(),
        namer.dir().display()
    );
    Ok(())
}

fn list_styles() {
    let colors = console::colors_enabled_stderr();
    for (i, bar) in BarStyle::all().iter().enumerate() {
        eprintln!(
            "{i:>2}  {}  {}/{}",
            bar.preview(20, colors),
            bar.foreground,
            bar.background
        );
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.list_styles {
        list_styles();
        return ExitCode::SUCCESS;
    }
    if cli.image.is_empty() && cli.img_dir.is_none() {
        Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "one of --image <IMAGE>... or --img-dir <IMG_DIR> is required",
            )
            .exit();
    }

    let _ = try_init_log_integration_with_level(cli.level());
    if let Err(err) = install_interrupt_handler() {
        log::warn!("could not install interrupt handler: {err}");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}{err}", style::ereset());
            if let Error::Item { source, .. } = &err {
                log::debug!("caused by: {source:?}");
            }
            ExitCode::FAILURE
        }
    }
}
