//! A single-line terminal progress bar.
//!
//! [`ProgressBar`] repaints one line in place with a carriage return: a
//! colored run of solid glyphs for the completed part, a run of empty glyphs
//! for the rest, and the percentage with two decimals.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use upscaler::progress::ProgressBarBuilder;
//!
//! let files = vec!["a.png", "b.png"];
//! let mut bar = ProgressBarBuilder::new(files.len())
//!     .width(50)
//!     .style(3)
//!     .build()?;
//!
//! for (i, _file) in files.iter().enumerate() {
//!     bar.update(i);
//! }
//! // dropping the bar has the same effect
//! bar.finish();
//! # Ok::<(), upscaler::Error>(())
//! ```
//!
//! # Update Rule
//!
//! `update(i)` treats `i` as the 0-based index of the item being worked on,
//! so the first call already shows `1 / (total - start_value)` of the bar and
//! `update(total - 1)` shows exactly `100.00%`. The numbers can be inspected
//! without drawing through [`ProgressBar::frame`].
//!
//! # Failure
//!
//! `update` never returns an error and never panics on bad input. If a frame
//! can't be computed (for instance `total <= start_value`, or a width
//! above [`MAX_WIDTH`]) or written, the
//! line shows ` <- Progress bar went wrong here` for that tick instead.
//!
//! # Output Modes
//!
//! - [`ProgressOutput::UI`] - repaint in place with ANSI colors
//! - [`ProgressOutput::Text`] - one plain line per update, for CI and log files
//!
//! Without [`set_output`], the mode is `UI` when stderr is an attended
//! terminal and `Text` otherwise.
//!
//! # Environment Variables
//!
//! - `UPSCALER_NO_PROGRESS=1` - draw nothing
//! - `UPSCALER_TEXT_MODE=1` - force [`ProgressOutput::Text`]
//! - `UPSCALER_TRACE_LOG=<path>` - append every frame to `<path>` as JSON lines
//! - `UPSCALER_TRACE_RAW=1` - keep ANSI codes in the trace log
//! - `NO_COLOR` - disable colors for bars built with [`ProgressBarBuilder::build`]
//!
//! # Sharing the Terminal
//!
//! Only one bar should draw on the terminal at a time. The bar built with
//! [`ProgressBarBuilder::build`] publishes its latest frame so that
//! [`ProgressLogger`] can clear the line, print a message and repaint the
//! bar. Use [`with_terminal_lock`] around other stderr writes.

mod bar;
mod diagnostics;
mod frame;
mod log;
mod output;
mod state;

pub use bar::{ProgressBar, ProgressBarBuilder};
pub use frame::{DIAGNOSTIC, Frame, FrameError, MAX_WIDTH};
pub use log::{
    ProgressLogger, init_log_integration, init_log_integration_with_level, try_init_log_integration,
    try_init_log_integration_with_level,
};
pub use output::{ProgressOutput, output, set_output};
pub use state::{current_line, install_interrupt_handler, is_disabled, with_terminal_lock};
