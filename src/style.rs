//! Terminal colors, bar glyphs and the fixed bar style table.
//!
//! Bar styles are looked up by index in [`BarStyle::from_index`]; there are
//! twelve of them (`0..=11`). Each pairs a foreground color and solid glyph
//! for the completed cells with a background color and empty glyph for the
//! remaining cells.
//!
//! The `e*` helpers style text for **stderr** and return plain text when
//! colors are disabled there (see `console`'s `NO_COLOR` handling).
//!
//! ```rust
//! use upscaler::style::{BarStyle, ecyan};
//!
//! let style = BarStyle::from_index(3).unwrap();
//! assert_eq!(style.solid, "█");
//! eprintln!("{}", ecyan("Info:"));
//! ```

use console::{StyledObject, style};

use crate::{Error, Result};

/// The ANSI sequence that resets all attributes.
pub const RESET: &str = "\x1b[0m";

/// Glyphs used for completed cells.
pub const SOLID_GLYPHS: [&str; 3] = ["█", "■", "▮"];

/// Glyphs used for remaining cells.
pub const EMPTY_GLYPHS: [&str; 4] = ["░", "⣀", "□", "▯"];

/// Colors available to bar styles.
///
/// These are the bright variants of the 8-color ANSI palette. `White` is the
/// terminal default and is emitted as a plain reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Color {
    White,
    Purple,
    Blue,
    Cyan,
    Green,
    Orange,
    Fail,
}

impl Color {
    /// Returns the SGR escape sequence selecting this color.
    pub const fn code(self) -> &'static str {
        match self {
            Color::White => RESET,
            Color::Purple => "\x1b[95m",
            Color::Blue => "\x1b[94m",
            Color::Cyan => "\x1b[96m",
            Color::Green => "\x1b[92m",
            Color::Orange => "\x1b[93m",
            Color::Fail => "\x1b[91m",
        }
    }
}

/// One entry of the bar style table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarStyle {
    pub foreground: Color,
    pub solid: &'static str,
    pub background: Color,
    pub empty: &'static str,
}

const fn bar(foreground: Color, solid: usize, background: Color, empty: usize) -> BarStyle {
    BarStyle {
        foreground,
        solid: SOLID_GLYPHS[solid],
        background,
        empty: EMPTY_GLYPHS[empty],
    }
}

const STYLE_COUNT: usize = 12;

/// Full blocks over braille dots (0..=5), then slim rectangles over hollow ones (6..=11).
static STYLES: [BarStyle; STYLE_COUNT] = [
    bar(Color::White, 0, Color::White, 1),
    bar(Color::Orange, 0, Color::Blue, 1),
    bar(Color::Orange, 0, Color::Cyan, 1),
    bar(Color::Green, 0, Color::White, 1),
    bar(Color::White, 0, Color::Green, 1),
    bar(Color::Cyan, 0, Color::White, 1),
    bar(Color::White, 2, Color::White, 2),
    bar(Color::Orange, 2, Color::Blue, 2),
    bar(Color::Orange, 2, Color::Cyan, 2),
    bar(Color::Green, 2, Color::White, 2),
    bar(Color::White, 2, Color::Green, 2),
    bar(Color::Cyan, 2, Color::White, 2),
];

impl BarStyle {
    /// Highest valid style index.
    pub const MAX_INDEX: usize = STYLE_COUNT - 1;

    /// Looks up a style by index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStyle`] for an index above [`BarStyle::MAX_INDEX`].
    pub fn from_index(index: usize) -> Result<BarStyle> {
        STYLES.get(index).copied().ok_or(Error::InvalidStyle(index))
    }

    /// Returns the whole style table in index order.
    pub fn all() -> &'static [BarStyle] {
        &STYLES
    }

    /// A short sample of this style, `width` cells wide and half filled.
    pub fn preview(&self, width: usize, colors: bool) -> String {
        let filled = width / 2;
        let (fg, bg, reset) = if colors {
            (self.foreground.code(), self.background.code(), RESET)
        } else {
            ("", "", "")
        };
        format!(
            "{fg}{}{bg}{}{reset}",
            self.solid.repeat(filled),
            self.empty.repeat(width - filled)
        )
    }
}

/// Returns the ANSI reset escape sequence for stderr, or an empty string if colors are disabled.
pub fn ereset() -> &'static str {
    if console::colors_enabled_stderr() {
        RESET
    } else {
        ""
    }
}

/// Creates a [`StyledObject`] configured for stderr output.
pub fn estyle<D>(val: D) -> StyledObject<D> {
    style(val).for_stderr()
}

/// Styles the value with cyan color for stderr.
pub fn ecyan<D>(val: D) -> StyledObject<D> {
    estyle(val).cyan()
}

/// Styles the value with green color for stderr.
pub fn egreen<D>(val: D) -> StyledObject<D> {
    estyle(val).green()
}

/// Styles the value with yellow color for stderr.
pub fn eyellow<D>(val: D) -> StyledObject<D> {
    estyle(val).yellow()
}

/// Styles the value with red color for stderr.
pub fn ered<D>(val: D) -> StyledObject<D> {
    estyle(val).red()
}

/// Styles the value with dim/faint formatting for stderr.
pub fn edim<D>(val: D) -> StyledObject<D> {
    estyle(val).dim()
}

/// Styles the value with bold formatting for stderr.
pub fn ebold<D>(val: D) -> StyledObject<D> {
    estyle(val).bold()
}
