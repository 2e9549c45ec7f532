//! The single-line progress bar and its builder.

use std::fmt;
use std::io::Write;

use console::Term;

use crate::Result;
use crate::osc::{self, ProgressState};
use crate::style::{BarStyle, RESET};

use super::diagnostics;
use super::frame::{DIAGNOSTIC, Frame, FrameError};
use super::output::{ProgressOutput, output};
use super::state::{is_disabled, lock_terminal, set_current_line};

/// Builder for [`ProgressBar`].
#[must_use]
#[derive(Debug, Clone)]
pub struct ProgressBarBuilder {
    total: usize,
    start_value: usize,
    width: usize,
    style: usize,
    colors: Option<bool>,
    output: Option<ProgressOutput>,
}

impl ProgressBarBuilder {
    /// Creates a builder for a bar that is complete after `total` units.
    ///
    /// `total` must be greater than the start value; other configurations
    /// are accepted but every frame they produce is replaced by a diagnostic.
    pub fn new(total: usize) -> Self {
        Self {
            total,
            start_value: 0,
            width: 100,
            style: 0,
            colors: None,
            output: None,
        }
    }

    /// Sets the value that maps to an empty bar (default 0).
    pub fn start_value(mut self, start_value: usize) -> Self {
        self.start_value = start_value;
        self
    }

    /// Sets the number of cells the bar occupies (default 100).
    ///
    /// Widths above [`MAX_WIDTH`](super::MAX_WIDTH) draw the diagnostic instead of a frame.
    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Selects an entry of the style table (default 0).
    pub fn style(mut self, style: usize) -> Self {
        self.style = style;
        self
    }

    /// Forces colors on or off instead of detecting terminal support.
    pub fn colors(mut self, colors: bool) -> Self {
        self.colors = Some(colors);
        self
    }

    /// Pins the output mode for this bar instead of following [`output()`].
    pub fn output(mut self, output: ProgressOutput) -> Self {
        self.output = Some(output);
        self
    }

    /// Builds a bar that draws on stderr and owns the terminal's current line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStyle`](crate::Error::InvalidStyle) if the style index is out of range.
    pub fn build(self) -> Result<ProgressBar<Term>> {
        let colors = self
            .colors
            .unwrap_or_else(console::colors_enabled_stderr);
        let mut bar = self.colors(colors).build_with_writer(Term::stderr())?;
        bar.terminal = true;
        Ok(bar)
    }

    /// Builds a bar that draws into `writer`.
    ///
    /// Colors default to on: the raw escape codes are written regardless of
    /// what the writer is.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStyle`](crate::Error::InvalidStyle) if the style index is out of range.
    pub fn build_with_writer<W: Write>(self, writer: W) -> Result<ProgressBar<W>> {
        let style = BarStyle::from_index(self.style)?;
        Ok(ProgressBar {
            writer,
            total: self.total,
            start_value: self.start_value,
            width: self.width,
            style,
            colors: self.colors.unwrap_or(true),
            output: self.output,
            terminal: false,
            drawn: false,
            finished: false,
        })
    }
}

/// A progress bar repainted in place on a single line.
///
/// The bar owns its writer, and [`update`](ProgressBar::update) takes `&mut self`,
/// so only one party ever draws on the line. Dropping the bar finishes it.
///
/// ```rust,no_run
/// use upscaler::progress::ProgressBarBuilder;
///
/// let items = ["a.png", "b.png", "c.png"];
/// let mut bar = ProgressBarBuilder::new(items.len()).width(50).style(3).build()?;
/// for (i, _item) in items.iter().enumerate() {
///     bar.update(i);
///     // ... work ...
/// }
/// bar.finish();
/// # Ok::<(), upscaler::Error>(())
/// ```
pub struct ProgressBar<W: Write> {
    writer: W,
    total: usize,
    start_value: usize,
    width: usize,
    style: BarStyle,
    colors: bool,
    output: Option<ProgressOutput>,
    terminal: bool,
    drawn: bool,
    finished: bool,
}

impl<W: Write> fmt::Debug for ProgressBar<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressBar")
            .field("total", &self.total)
            .field("start_value", &self.start_value)
            .field("width", &self.width)
            .field("style", &self.style)
            .field("colors", &self.colors)
            .field("terminal", &self.terminal)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

impl<W: Write> ProgressBar<W> {
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn start_value(&self) -> usize {
        self.start_value
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn style(&self) -> &BarStyle {
        &self.style
    }

    /// The sink the bar draws into.
    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Computes the frame `update(progress)` would draw, without drawing it.
    pub fn frame(&self, progress: usize) -> std::result::Result<Frame, FrameError> {
        Frame::compute(progress, self.start_value, self.total, self.width)
    }

    fn mode(&self) -> ProgressOutput {
        self.output.unwrap_or_else(output)
    }

    /// Repaints the bar for `progress`, the 0-based index of the current item.
    ///
    /// Never fails: a frame that can't be computed or written is replaced by a
    /// short diagnostic and the caller carries on.
    pub fn update(&mut self, progress: usize) {
        if self.finished || is_disabled() {
            return;
        }
        let mode = self.mode();
        let (line, frame) = match self.frame(progress) {
            Ok(frame) => {
                let line = match mode {
                    ProgressOutput::UI => frame.render(&self.style, self.colors),
                    ProgressOutput::Text => frame.render_text(self.start_value),
                };
                diagnostics::log_frame(&line, &frame);
                (line, Some(frame))
            }
            Err(err) => {
                log::debug!("progress frame for {progress} failed: {err}");
                (self.diagnostic_line(mode), None)
            }
        };

        let _guard = self.terminal.then(lock_terminal);
        if self.write(&line).is_err() {
            let fallback = self.diagnostic_line(mode);
            let _ = self.write(&fallback);
        }
        self.drawn = true;

        if self.terminal && mode == ProgressOutput::UI {
            set_current_line(Some(line));
            if let Some(frame) = frame {
                osc::set_progress(ProgressState::Normal, frame.percent as u8);
            }
        }
    }

    fn diagnostic_line(&self, mode: ProgressOutput) -> String {
        match mode {
            ProgressOutput::UI => format!("\r{DIAGNOSTIC}\x1b[K"),
            ProgressOutput::Text => format!("{DIAGNOSTIC}\n"),
        }
    }

    fn write(&mut self, s: &str) -> std::io::Result<()> {
        self.writer.write_all(s.as_bytes())?;
        self.writer.flush()
    }

    /// Ends the bar's line: resets colors and writes the terminating newline.
    ///
    /// Only the first call has an effect. Also called on drop.
    pub fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        if !self.drawn || is_disabled() {
            return;
        }

        let _guard = self.terminal.then(lock_terminal);
        if self.mode() == ProgressOutput::UI {
            let end = if self.colors {
                format!("{RESET}\n")
            } else {
                "\n".to_string()
            };
            let _ = self.write(&end);
        }
        if self.terminal {
            set_current_line(None);
            osc::clear_progress();
        }
    }
}

impl<W: Write> ProgressBar<W> {
    /// Finishes the bar after a failure, flagging the terminal indicator as failed.
    pub fn abandon(&mut self) {
        if self.terminal && !self.finished && self.drawn {
            let _guard = lock_terminal();
            osc::set_progress(ProgressState::Error, 100);
        }
        self.finish();
    }
}

impl<W: Write> Drop for ProgressBar<W> {
    fn drop(&mut self) {
        self.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(total: usize, width: usize, style: usize) -> ProgressBar<Vec<u8>> {
        ProgressBarBuilder::new(total)
            .width(width)
            .style(style)
            .output(ProgressOutput::UI)
            .build_with_writer(Vec::new())
            .unwrap()
    }

    fn written(bar: &ProgressBar<Vec<u8>>) -> String {
        String::from_utf8(bar.writer().clone()).unwrap()
    }

    #[test]
    fn test_builder_defaults() {
        let bar = ProgressBarBuilder::new(7)
            .build_with_writer(Vec::new())
            .unwrap();
        assert_eq!(bar.total(), 7);
        assert_eq!(bar.start_value(), 0);
        assert_eq!(bar.width(), 100);
        assert_eq!(bar.style(), &BarStyle::from_index(0).unwrap());
    }

    #[test]
    fn test_invalid_style_is_rejected() {
        let err = ProgressBarBuilder::new(10)
            .style(12)
            .build_with_writer(Vec::new())
            .unwrap_err();
        assert!(matches!(err, crate::Error::InvalidStyle(12)));
    }

    #[test]
    fn test_update_writes_one_segment() {
        let mut bar = bar(4, 4, 0);
        bar.update(0);
        assert_eq!(written(&bar), "\r\x1b[0m█\x1b[0m⣀⣀⣀ \x1b[0m: 25.00%");
    }

    #[test]
    fn test_updates_overwrite() {
        let mut bar = bar(10, 10, 3);
        bar.update(0);
        bar.update(1);
        let out = written(&bar);
        assert_eq!(out.matches('\r').count(), 2);
        assert!(!out.contains('\n'));
        assert!(out.ends_with("20.00%"));
    }

    #[test]
    fn test_finish_resets_and_ends_line() {
        let mut bar = bar(2, 4, 0);
        bar.update(0);
        bar.finish();
        bar.finish();
        let out = written(&bar);
        assert!(out.ends_with("50.00%\x1b[0m\n"), "{out:?}");
        assert_eq!(out.matches('\n').count(), 1);
        assert!(bar.is_finished());
    }

    #[test]
    fn test_finish_without_updates_writes_nothing() {
        let mut bar = bar(2, 4, 0);
        bar.finish();
        assert!(written(&bar).is_empty());
    }

    #[test]
    fn test_abandon_finishes() {
        let mut bar = bar(3, 3, 5);
        bar.update(0);
        bar.abandon();
        assert!(bar.is_finished());
        assert!(written(&bar).ends_with('\n'));
    }

    #[test]
    fn test_update_after_finish_is_ignored() {
        let mut bar = bar(2, 4, 0);
        bar.update(0);
        bar.finish();
        let before = written(&bar);
        bar.update(1);
        assert_eq!(written(&bar), before);
    }

    #[test]
    fn test_bad_frame_prints_diagnostic() {
        let mut bar = ProgressBarBuilder::new(10)
            .start_value(5)
            .width(10)
            .output(ProgressOutput::UI)
            .build_with_writer(Vec::new())
            .unwrap();
        bar.update(0);
        let out = written(&bar);
        assert!(out.starts_with('\r'));
        assert!(out.contains(DIAGNOSTIC));

        // the bar keeps working afterwards
        bar.update(9);
        assert!(written(&bar).ends_with("100.00%"));
    }

    #[test]
    fn test_text_mode_lines() {
        let mut bar = ProgressBarBuilder::new(2)
            .width(10)
            .output(ProgressOutput::Text)
            .build_with_writer(Vec::new())
            .unwrap();
        bar.update(0);
        bar.update(1);
        bar.finish();
        assert_eq!(written(&bar), "[1/2] 50.00%\n[2/2] 100.00%\n");
    }

    #[test]
    fn test_no_colors() {
        let mut bar = ProgressBarBuilder::new(2)
            .width(2)
            .colors(false)
            .output(ProgressOutput::UI)
            .build_with_writer(Vec::new())
            .unwrap();
        bar.update(1);
        bar.finish();
        assert_eq!(written(&bar), "\r██ : 100.00%\n");
    }

    #[test]
    fn test_huge_width_prints_diagnostic() {
        let mut bar = ProgressBarBuilder::new(10)
            .width(usize::MAX)
            .output(ProgressOutput::UI)
            .build_with_writer(Vec::new())
            .unwrap();
        bar.update(0);
        assert_eq!(written(&bar), format!("\r{DIAGNOSTIC}\x1b[K"));
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_errors_are_swallowed() {
        let mut bar = ProgressBarBuilder::new(3)
            .build_with_writer(FailingWriter)
            .unwrap();
        bar.update(0);
        bar.update(1);
        bar.finish();
    }
}
