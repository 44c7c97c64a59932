//! Geometry
//!
//! Placement arithmetic for putting one block of text inside the terminal.
//! Nothing here fails: oversized content clamps to a zero offset and short
//! lines are padded, so every caller gets a usable answer.

use crate::compositor::ansi;

/// The terminal's size in character cells
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// A viewport with no cells to draw into
    pub const fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Offset `(top, left)` that centers content in the viewport
///
/// Uses floor division and clamps each axis to 0 when the content is larger
/// than the viewport in that dimension.
pub fn center(
    content_width: usize,
    content_height: usize,
    viewport_width: u16,
    viewport_height: u16,
) -> (usize, usize) {
    let top = usize::from(viewport_height).saturating_sub(content_height) / 2;
    let left = usize::from(viewport_width).saturating_sub(content_width) / 2;
    (top, left)
}

/// Right-pad a line with spaces to `width` display columns
///
/// Lines already at least `width` wide are returned unchanged.
pub fn pad_to_width(line: &str, width: usize) -> String {
    let current = ansi::display_width(line);
    if current >= width {
        return line.to_string();
    }
    let mut padded = String::with_capacity(line.len() + width - current);
    padded.push_str(line);
    padded.extend(std::iter::repeat(' ').take(width - current));
    padded
}

/// Truncate or pad a line to exactly `width` display columns
pub fn fit_to_width(line: &str, width: usize) -> String {
    if ansi::display_width(line) > width {
        pad_to_width(&ansi::truncate(line, width), width)
    } else {
        pad_to_width(line, width)
    }
}
