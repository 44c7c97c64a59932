//! TextBlock and Frame
//!
//! Styled multi-line text as produced by the base view and every panel, and
//! the viewport-sized block that is finally printed.

use std::fmt;

use crate::compositor::ansi;
use crate::geometry::{fit_to_width, Viewport};

/// An ordered sequence of styled lines
///
/// Width and height are derived from the content. Width is the widest line's
/// display width, so escape sequences never count.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextBlock {
    lines: Vec<String>,
}

impl TextBlock {
    /// The empty block (zero lines)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// A single row, if present
    pub fn line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn height(&self) -> usize {
        self.lines.len()
    }

    /// Display width of the widest line
    pub fn width(&self) -> usize {
        self.lines
            .iter()
            .map(|l| ansi::display_width(l))
            .max()
            .unwrap_or(0)
    }

    /// Lines with all escape sequences removed
    pub fn plain_lines(&self) -> Vec<String> {
        self.lines.iter().map(|l| ansi::strip(l)).collect()
    }
}

impl From<&str> for TextBlock {
    fn from(text: &str) -> Self {
        if text.is_empty() {
            return Self::new();
        }
        Self::from_lines(text.split('\n').map(|l| l.trim_end_matches('\r')))
    }
}

impl From<String> for TextBlock {
    fn from(text: String) -> Self {
        Self::from(text.as_str())
    }
}

impl From<Vec<String>> for TextBlock {
    fn from(lines: Vec<String>) -> Self {
        Self { lines }
    }
}

impl fmt::Display for TextBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

/// A block sized exactly to the viewport
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    block: TextBlock,
    viewport: Viewport,
}

impl Frame {
    /// Clamp or pad a block to the viewport's exact dimensions
    ///
    /// Extra rows are dropped, missing rows are blank, and every row is cut or
    /// padded to exactly `viewport.width` columns.
    pub fn fit(block: TextBlock, viewport: Viewport) -> Self {
        let width = usize::from(viewport.width);
        let mut lines = block.into_lines();
        lines.resize(usize::from(viewport.height), String::new());
        let lines = lines
            .into_iter()
            .map(|line| fit_to_width(&line, width))
            .collect();

        Self {
            block: TextBlock { lines },
            viewport,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn lines(&self) -> &[String] {
        self.block.lines()
    }

    pub fn block(&self) -> &TextBlock {
        &self.block
    }
}
