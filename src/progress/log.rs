//! Integration with the `log` crate.
//!
//! [`ProgressLogger`] writes `LEVEL message` lines to stderr. When a
//! terminal-bound bar is showing, the logger clears the bar's line first and
//! repaints the bar after the message, so messages and the bar never share a
//! line.
//!
//! ```rust,no_run
//! use upscaler::progress::{ProgressBarBuilder, init_log_integration};
//! use log::info;
//!
//! init_log_integration();
//!
//! let mut bar = ProgressBarBuilder::new(3).build()?;
//! for i in 0..3 {
//!     info!("processing item {i}");
//!     bar.update(i);
//! }
//! # Ok::<(), upscaler::Error>(())
//! ```

use super::state::{current_line, lock_terminal};
use crate::style;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;

/// A logger that cooperates with the live progress line.
pub struct ProgressLogger {
    level: LevelFilter,
    target_filter: Option<String>,
}

impl ProgressLogger {
    /// Creates a new progress-aware logger showing messages up to `level`.
    pub fn new(level: LevelFilter) -> Self {
        Self {
            level,
            target_filter: None,
        }
    }

    /// Creates a logger that only shows messages whose target starts with `target`.
    pub fn with_target(level: LevelFilter, target: impl Into<String>) -> Self {
        Self {
            level,
            target_filter: Some(target.into()),
        }
    }

    /// Installs this logger as the global logger.
    ///
    /// # Errors
    ///
    /// Returns an error if a logger has already been set.
    pub fn init(self) -> Result<(), SetLoggerError> {
        let level = self.level;
        // Set logger first to avoid modifying max level if logger installation fails
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }

    fn format_message(&self, record: &Record) -> String {
        let level_str = match record.level() {
            Level::Error => style::ered("ERROR").to_string(),
            Level::Warn => style::eyellow("WARN").to_string(),
            Level::Info => style::ecyan("INFO").to_string(),
            Level::Debug => style::edim("DEBUG").to_string(),
            Level::Trace => style::edim("TRACE").to_string(),
        };
        format!("[{}] {}", level_str, record.args())
    }
}

/// Builds what gets written for one message: clear the bar's line if one is
/// showing, print the message, repaint the bar.
fn interleave(message: &str, bar_line: Option<&str>) -> String {
    match bar_line {
        Some(line) => format!("\r\x1b[2K{}{message}\n{line}", style::ereset()),
        None => format!("{message}\n"),
    }
}

impl Log for ProgressLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if metadata.level() > self.level {
            return false;
        }
        if let Some(ref filter) = self.target_filter {
            metadata.target().starts_with(filter)
        } else {
            true
        }
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let message = self.format_message(record);
        let _guard = lock_terminal();
        let out = interleave(&message, current_line().as_deref());
        let mut stderr = std::io::stderr().lock();
        let _ = stderr.write_all(out.as_bytes());
        let _ = stderr.flush();
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Initializes the progress-aware logger at the `Info` level.
///
/// # Panics
///
/// Panics if a logger has already been initialized.
pub fn init_log_integration() {
    init_log_integration_with_level(LevelFilter::Info);
}

/// Initializes the progress-aware logger with a custom log level.
///
/// # Panics
///
/// Panics if a logger has already been initialized.
pub fn init_log_integration_with_level(level: LevelFilter) {
    ProgressLogger::new(level)
        .init()
        .expect("Failed to initialize logger - another logger may already be set");
}

/// Tries to initialize the progress-aware logger at the `Info` level.
///
/// # Errors
///
/// Returns an error if a logger has already been set.
pub fn try_init_log_integration() -> Result<(), SetLoggerError> {
    ProgressLogger::new(LevelFilter::Info).init()
}

/// Tries to initialize the progress-aware logger with a custom level.
///
/// # Errors
///
/// Returns an error if a logger has already been set.
pub fn try_init_log_integration_with_level(level: LevelFilter) -> Result<(), SetLoggerError> {
    ProgressLogger::new(level).init()
}
