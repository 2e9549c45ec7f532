//! The update rule of the progress bar and the text of a single frame.

use std::fmt;

use thiserror::Error;

use crate::style::{BarStyle, RESET};

/// Printed in place of a frame that could not be drawn.
pub const DIAGNOSTIC: &str = " <- Progress bar went wrong here";

/// Widest bar a frame will be drawn for.
pub const MAX_WIDTH: usize = u16::MAX as usize;

/// Why a frame could not be computed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrameError {
    /// The percentage came out as NaN or infinite, typically because
    /// `total <= start_value`.
    #[error("percentage is not finite ({0})")]
    NonFinite(f64),
    /// The number of filled cells falls outside `0..=width`.
    #[error("{filled} filled cells do not fit a bar {width} cells wide")]
    FillOutOfRange { filled: f64, width: usize },
    /// The bar is wider than [`MAX_WIDTH`] cells.
    #[error("a bar {0} cells wide is wider than {MAX_WIDTH}")]
    TooWide(usize),
}

/// The numbers behind one repaint of the bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// The progress value that produced this frame.
    pub progress: usize,
    pub total: usize,
    /// `progress` mapped onto `0..=total` relative to the start value.
    pub scaled: f64,
    /// Completion in percent; exactly `100.0` from `progress == total - 1` on.
    pub percent: f64,
    /// Number of solid cells, always within `0..=width`.
    pub filled: usize,
    pub width: usize,
}

impl Frame {
    /// Computes the frame for `progress`, a 0-based index of the item being worked on.
    ///
    /// `progress` counts as already done, so the first item shows `1 / (total - start)`
    /// of the bar and the last one (`total - 1`) shows a full bar.
    pub fn compute(
        progress: usize,
        start_value: usize,
        total: usize,
        width: usize,
    ) -> Result<Frame, FrameError> {
        if width > MAX_WIDTH {
            return Err(FrameError::TooWide(width));
        }
        let total_f = total as f64;
        let scaled =
            ((progress as f64 - start_value as f64 + 1.0) / (total_f - start_value as f64)) * total_f;
        let percent = if progress < total.saturating_sub(1) {
            100.0 * (scaled / total_f)
        } else {
            100.0
        };
        if !percent.is_finite() {
            return Err(FrameError::NonFinite(percent));
        }
        let filled = (percent * width as f64 / 100.0).floor();
        if filled < 0.0 || filled > width as f64 {
            return Err(FrameError::FillOutOfRange { filled, width });
        }
        Ok(Frame {
            progress,
            total,
            scaled,
            percent,
            filled: filled as usize,
            width,
        })
    }

    /// Number of cells still empty.
    pub fn remaining(&self) -> usize {
        self.width - self.filled
    }

    /// The in-place terminal line: carriage return, colored bar, percentage. No newline.
    pub fn render(&self, style: &BarStyle, colors: bool) -> String {
        let (fg, bg, reset) = if colors {
            (style.foreground.code(), style.background.code(), RESET)
        } else {
            ("", "", "")
        };
        format!(
            "\r{fg}{}{bg}{} {reset}: {self}",
            style.solid.repeat(self.filled),
            style.empty.repeat(self.remaining()),
        )
    }

    /// A plain, newline-terminated line for logs and CI output.
    pub fn render_text(&self, start_value: usize) -> String {
        let done = (self.progress + 1).saturating_sub(start_value);
        let of = self.total.saturating_sub(start_value);
        format!("[{done}/{of}] {self}\n")
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(index: usize) -> BarStyle {
        BarStyle::from_index(index).unwrap()
    }

    #[test]
    fn test_first_item_of_ten() {
        let frame = Frame::compute(0, 0, 10, 10).unwrap();
        assert_eq!(frame.scaled, 1.0);
        assert_eq!(frame.percent, 10.0);
        assert_eq!(frame.filled, 1);
    }

    #[test]
    fn test_last_item_forces_completion() {
        let frame = Frame::compute(99, 0, 100, 10).unwrap();
        assert_eq!(frame.percent, 100.0);
        assert_eq!(frame.filled, 10);
        assert_eq!(frame.to_string(), "100.00%");
    }

    #[test]
    fn test_five_step_sequence() {
        let frames: Vec<_> = (0..5)
            .map(|i| Frame::compute(i, 0, 5, 5).unwrap())
            .collect();
        let filled: Vec<_> = frames.iter().map(|f| f.filled).collect();
        let percent: Vec<_> = frames.iter().map(|f| f.percent).collect();
        assert_eq!(filled, vec![1, 2, 3, 4, 5]);
        assert_eq!(percent, vec![20.0, 40.0, 60.0, 80.0, 100.0]);
    }

    #[test]
    fn test_filled_stays_in_bounds() {
        for total in 1..40 {
            for width in [0, 1, 7, 10, 50, 100] {
                for progress in 0..total {
                    let frame = Frame::compute(progress, 0, total, width).unwrap();
                    assert!(frame.filled <= width, "{progress}/{total} w={width}");
                }
            }
        }
    }

    #[test]
    fn test_start_value_offsets_progress() {
        // 10 items numbered 5..15
        let frame = Frame::compute(5, 5, 15, 20).unwrap();
        assert_eq!(frame.scaled, 1.5);
        assert_eq!(frame.percent, 10.0);
        assert_eq!(frame.filled, 2);

        let frame = Frame::compute(14, 5, 15, 20).unwrap();
        assert_eq!(frame.percent, 100.0);
    }

    #[test]
    fn test_progress_before_start_fails() {
        let err = Frame::compute(0, 3, 10, 10).unwrap_err();
        assert!(matches!(err, FrameError::FillOutOfRange { .. }), "{err:?}");
    }

    #[test]
    fn test_total_equal_to_start_fails() {
        let err = Frame::compute(0, 4, 4, 10).unwrap_err();
        assert!(matches!(err, FrameError::FillOutOfRange { .. } | FrameError::NonFinite(_)));
    }

    #[test]
    fn test_oversized_width_fails() {
        assert!(Frame::compute(0, 0, 10, MAX_WIDTH).is_ok());
        let err = Frame::compute(0, 0, 10, usize::MAX).unwrap_err();
        assert_eq!(err, FrameError::TooWide(usize::MAX));
    }

    #[test]
    fn test_empty_total_is_complete() {
        let frame = Frame::compute(0, 0, 0, 10).unwrap();
        assert_eq!(frame.percent, 100.0);
        assert_eq!(frame.filled, 10);
    }

    #[test]
    fn test_render_with_colors() {
        let frame = Frame::compute(0, 0, 4, 4).unwrap();
        let line = frame.render(&style(1), true);
        assert_eq!(line, "\r\x1b[93m█\x1b[94m⣀⣀⣀ \x1b[0m: 25.00%");
    }

    #[test]
    fn test_render_without_colors() {
        let frame = Frame::compute(1, 0, 4, 4).unwrap();
        let line = frame.render(&style(6), false);
        assert_eq!(line, "\r▮▮□□ : 50.00%");
        assert!(!line.contains('\n'));
    }

    #[test]
    fn test_render_text() {
        let frame = Frame::compute(2, 0, 8, 10).unwrap();
        assert_eq!(frame.render_text(0), "[3/8] 37.50%\n");
    }
}
