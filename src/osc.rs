//! OSC 9;4 escape sequences for terminal progress indicators
//!
//! Terminals such as Ghostty, VS Code, Windows Terminal and VTE-based ones
//! show a progress indicator in the tab or taskbar when they receive
//! `ESC ] 9 ; 4 ; <state> ; <percent> ESC \`. A terminal-bound progress bar
//! mirrors its percentage there.

use std::io::Write;
use std::sync::OnceLock;

static OSC_ENABLED: OnceLock<bool> = OnceLock::new();

/// Enable or disable OSC progress. Must be called before the first bar draws.
///
/// Returns `false` if the setting was already fixed.
pub fn configure(enabled: bool) -> bool {
    OSC_ENABLED.set(enabled).is_ok()
}

pub(crate) fn is_enabled() -> bool {
    *OSC_ENABLED.get_or_init(|| std::env::var("UPSCALER_NO_OSC").is_err())
}

/// OSC 9;4 states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressState {
    /// Removes the indicator
    None,
    /// Regular progress with a percentage
    Normal,
    /// Failure, usually shown in red
    Error,
}

impl ProgressState {
    fn as_code(&self) -> u8 {
        match self {
            ProgressState::None => 0,
            ProgressState::Normal => 1,
            ProgressState::Error => 2,
        }
    }
}

fn terminal_supports_osc_9_4() -> bool {
    static SUPPORTS: OnceLock<bool> = OnceLock::new();

    *SUPPORTS.get_or_init(|| {
        match std::env::var("TERM_PROGRAM").as_deref() {
            Ok("ghostty" | "vscode") => return true,
            // iTerm2 treats OSC 9 as a notification
            Ok("iTerm.app" | "WezTerm" | "Alacritty") => return false,
            _ => {}
        }
        std::env::var("WT_SESSION").is_ok() || std::env::var("VTE_VERSION").is_ok()
    })
}

fn sequence(state: ProgressState, percent: u8) -> String {
    format!("\x1b]9;4;{};{}\x1b\\", state.as_code(), percent.min(100))
}

pub(crate) fn set_progress(state: ProgressState, percent: u8) {
    let _ = write_progress(state, percent);
}

fn write_progress(state: ProgressState, percent: u8) -> std::io::Result<()> {
    if !is_enabled() || !console::user_attended_stderr() || !terminal_supports_osc_9_4() {
        return Ok(());
    }
    let mut stderr = std::io::stderr();
    stderr.write_all(sequence(state, percent).as_bytes())?;
    stderr.flush()
}

pub(crate) fn clear_progress() {
    set_progress(ProgressState::None, 0);
}
