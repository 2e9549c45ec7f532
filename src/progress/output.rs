//! Output mode selection for progress display.
//!
//! Unless a mode is set with [`set_output`], bars repaint in place only when
//! stderr is a terminal someone is watching. Redirected to a file or a pipe,
//! they print one plain line per update so the log stays readable.

use std::sync::{Mutex, PoisonError};

use super::state::env_text_mode;

/// Output mode for progress display.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum ProgressOutput {
    /// Repaint a single line in place with `\r` and ANSI colors.
    UI,
    /// Print one plain line per update, for CI systems and log files.
    Text,
}

/// The mode chosen with [`set_output`], if any.
static OUTPUT: Mutex<Option<ProgressOutput>> = Mutex::new(None);

/// Sets the output mode for progress display, overriding terminal detection.
///
/// Bars read the mode on every update, so switching mid-loop takes effect on the next frame.
///
/// ```rust,no_run
/// use upscaler::progress::{set_output, ProgressOutput};
///
/// if std::env::var("CI").is_ok() {
///     set_output(ProgressOutput::Text);
/// }
/// ```
pub fn set_output(output: ProgressOutput) {
    *OUTPUT.lock().unwrap_or_else(PoisonError::into_inner) = Some(output);
}

/// Returns the current output mode.
///
/// `UPSCALER_TEXT_MODE=1` forces [`ProgressOutput::Text`]. Otherwise the mode
/// given to [`set_output`] wins, and without one it is `UI` exactly when
/// stderr is an attended terminal.
#[must_use]
pub fn output() -> ProgressOutput {
    let chosen = *OUTPUT.lock().unwrap_or_else(PoisonError::into_inner);
    select(env_text_mode(), chosen, console::user_attended_stderr())
}

fn select(forced_text: bool, chosen: Option<ProgressOutput>, attended: bool) -> ProgressOutput {
    if forced_text {
        return ProgressOutput::Text;
    }
    match chosen {
        Some(mode) => mode,
        None if attended => ProgressOutput::UI,
        None => ProgressOutput::Text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_follows_terminal() {
        assert_eq!(select(false, None, true), ProgressOutput::UI);
        assert_eq!(select(false, None, false), ProgressOutput::Text);
    }

    #[test]
    fn test_select_prefers_explicit_mode() {
        assert_eq!(
            select(false, Some(ProgressOutput::UI), false),
            ProgressOutput::UI
        );
        assert_eq!(
            select(false, Some(ProgressOutput::Text), true),
            ProgressOutput::Text
        );
    }

    #[test]
    fn test_select_env_forces_text() {
        assert_eq!(
            select(true, Some(ProgressOutput::UI), true),
            ProgressOutput::Text
        );
        assert_eq!(select(true, None, true), ProgressOutput::Text);
    }

    #[test]
    fn test_set_output_is_used() {
        set_output(ProgressOutput::Text);
        assert_eq!(output(), ProgressOutput::Text);
    }
}
