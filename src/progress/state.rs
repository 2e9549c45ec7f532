//! Process-wide state shared by terminal-bound bars and the logger.
//!
//! Only one bar may own the terminal line at a time. The bar that does
//! publishes its latest frame here so that log output can clear the line,
//! print, and repaint it.

use std::sync::{LazyLock, Mutex, MutexGuard, OnceLock, PoisonError};

// =============================================================================
// Environment Variable Controls
// =============================================================================

static ENV_NO_PROGRESS: OnceLock<bool> = OnceLock::new();
static ENV_TEXT_MODE: OnceLock<bool> = OnceLock::new();

/// Checks if an environment variable is set to a truthy value ("1" or "true").
fn check_env_bool(var_name: &str) -> bool {
    std::env::var(var_name)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Returns true if text mode is forced via `UPSCALER_TEXT_MODE=1`.
pub(crate) fn env_text_mode() -> bool {
    *ENV_TEXT_MODE.get_or_init(|| check_env_bool("UPSCALER_TEXT_MODE"))
}

/// Returns whether progress display is disabled.
///
/// Progress is disabled when `UPSCALER_NO_PROGRESS` is set to `1` or `true`.
/// Bars can still be created and updated; nothing is drawn.
#[must_use]
pub fn is_disabled() -> bool {
    *ENV_NO_PROGRESS.get_or_init(|| check_env_bool("UPSCALER_NO_PROGRESS"))
}

// =============================================================================
// Terminal Line
// =============================================================================

/// Serializes writes to the terminal between the bar and the logger.
pub(crate) static TERM_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

/// The frame currently shown on the terminal line, if a bar owns it.
static CURRENT_LINE: Mutex<Option<String>> = Mutex::new(None);

/// Acquires the terminal lock, ignoring poisoning so a panicked writer can't wedge output.
pub(crate) fn lock_terminal() -> MutexGuard<'static, ()> {
    TERM_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn set_current_line(line: Option<String>) {
    *CURRENT_LINE.lock().unwrap_or_else(PoisonError::into_inner) = line;
}

/// Returns the frame currently painted on the terminal line.
#[must_use]
pub fn current_line() -> Option<String> {
    CURRENT_LINE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Executes a function while holding the terminal lock.
///
/// Use this around your own stderr writes so they don't land in the middle
/// of a frame.
#[must_use]
pub fn with_terminal_lock<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = lock_terminal();
    f()
}

// =============================================================================
// Interrupt Handling (Unix)
// =============================================================================

/// Written on interrupt so the shell prompt isn't left in the bar's colors.
#[cfg(unix)]
const INTERRUPT_RESET: &[u8] = b"\x1b[0m\n";

#[cfg(unix)]
extern "C" fn handle_sigint(_: nix::libc::c_int) {
    // Only async-signal-safe calls from here on.
    unsafe {
        nix::libc::write(
            nix::libc::STDERR_FILENO,
            INTERRUPT_RESET.as_ptr().cast(),
            INTERRUPT_RESET.len(),
        );
        nix::libc::_exit(130);
    }
}

/// Installs a SIGINT handler that resets terminal colors and exits with status 130.
///
/// # Errors
///
/// Returns an error if the handler cannot be registered.
#[cfg(unix)]
pub fn install_interrupt_handler() -> crate::Result<()> {
    use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet, Signal, sigaction};
    let handler = SigHandler::Handler(handle_sigint);
    let action = SigAction::new(handler, SaFlags::SA_RESTART, SigSet::empty());
    unsafe {
        sigaction(Signal::SIGINT, &action)?;
    }
    Ok(())
}

/// No-op on platforms without POSIX signals.
#[cfg(not(unix))]
pub fn install_interrupt_handler() -> crate::Result<()> {
    Ok(())
}
