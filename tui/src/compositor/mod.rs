//! Layered Compositor
//!
//! Merges the base view and at most one overlay into a single frame.
//!
//! Centered overlays are placed with [`crate::geometry`] and merged row by
//! row. Rows where the overlay is blank show the base; other rows are spliced
//! at the character level so the base stays visible on both sides of the
//! overlay's content. Bottom bars skip geometry entirely: the base keeps its
//! bottom-most rows and the bar replaces the last of them.
//!
//! Nothing in here returns an error or panics. Oversized, empty, or
//! degenerate input degrades to a deterministic best-effort result.

pub mod ansi;

use std::sync::Arc;

use crate::geometry::{center, fit_to_width, pad_to_width, Viewport};
use crate::theme::Theme;
use crate::widgets::{Frame, TextBlock};

/// Where an overlay goes relative to the base view
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Placement {
    /// Centered over a dimmable base
    Centered,
    /// Replaces the base's final line
    BottomBar,
}

/// Everything needed to produce one frame
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositionRequest {
    pub base: TextBlock,
    pub overlay: Option<TextBlock>,
    pub dim: bool,
    pub placement: Placement,
}

impl CompositionRequest {
    /// Just the base view
    pub fn base(base: TextBlock) -> Self {
        Self {
            base,
            overlay: None,
            dim: false,
            placement: Placement::Centered,
        }
    }
}

/// Produces frames for the current viewport
pub struct Compositor {
    viewport: Viewport,
    /// Cached SGR prefix for the theme's backdrop style
    backdrop: String,
}

impl Compositor {
    pub fn new(viewport: Viewport, theme: Arc<Theme>) -> Self {
        Self {
            viewport,
            backdrop: theme.backdrop_prefix(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Center `content` in a viewport-sized block
    pub fn place(&self, content: &TextBlock) -> TextBlock {
        place(content, self.viewport)
    }

    /// Render a block through the backdrop style
    pub fn apply_dim(&self, block: &TextBlock) -> TextBlock {
        TextBlock::from_lines(
            block
                .lines()
                .iter()
                .map(|line| ansi::restyle(line, &self.backdrop)),
        )
    }

    /// Merge a centered overlay into the base
    pub fn compose(&self, base: &TextBlock, overlay: &TextBlock, dim: bool) -> TextBlock {
        match (base.is_empty(), overlay.is_empty()) {
            (true, true) => return TextBlock::new(),
            (true, false) => return self.place(overlay),
            (false, true) if dim => return self.apply_dim(base),
            (false, true) => return base.clone(),
            (false, false) => {}
        }

        let base = if dim {
            self.apply_dim(base)
        } else {
            base.clone()
        };
        let placed = self.place(overlay);

        let degenerate = self.viewport.is_degenerate();
        let rows = if degenerate {
            base.height().max(placed.height())
        } else {
            usize::from(self.viewport.height)
        };
        let width = usize::from(self.viewport.width);

        let lines = (0..rows).map(|row| {
            let base_line = base.line(row).unwrap_or("");
            let overlay_line = placed.line(row).unwrap_or("");
            let merged = if ansi::strip(overlay_line).trim().is_empty() {
                base_line.to_string()
            } else {
                composite_line(base_line, overlay_line)
            };
            if degenerate {
                merged
            } else {
                fit_to_width(&merged, width)
            }
        });

        TextBlock::from_lines(lines)
    }

    /// Produce a frame with the viewport's exact dimensions
    pub fn frame(&self, request: CompositionRequest) -> Frame {
        let CompositionRequest {
            base,
            overlay,
            dim,
            placement,
        } = request;

        let block = match (overlay, placement) {
            (None, _) if dim => self.apply_dim(&base),
            (None, _) => base,
            (Some(overlay), Placement::Centered) => self.compose(&base, &overlay, dim),
            (Some(bar), Placement::BottomBar) => {
                let base = if dim { self.apply_dim(&base) } else { base };
                let base = if self.viewport.is_degenerate() {
                    base
                } else {
                    bottom_rows(&base, usize::from(self.viewport.height))
                };
                replace_bottom_line(&base, &bar)
            }
        };

        Frame::fit(block, self.viewport)
    }
}

/// Center `content` in a block the size of `viewport`
///
/// Rows above and below are blank, and every row is padded to the viewport
/// width. Content larger than the viewport is anchored at the top-left and
/// left intact. A degenerate viewport returns `content` unchanged.
pub fn place(content: &TextBlock, viewport: Viewport) -> TextBlock {
    if viewport.is_degenerate() {
        return content.clone();
    }

    let width = usize::from(viewport.width);
    let height = usize::from(viewport.height);
    let (top, left) = center(content.width(), content.height(), viewport.width, viewport.height);

    let blank = " ".repeat(width);
    let indent = " ".repeat(left);
    let mut lines = Vec::with_capacity(height.max(top + content.height()));

    lines.extend(std::iter::repeat(blank.clone()).take(top));
    for line in content.lines() {
        lines.push(pad_to_width(&format!("{indent}{line}"), width));
    }
    while lines.len() < height {
        lines.push(blank.clone());
    }

    TextBlock::from_lines(lines)
}

/// Splice the visible content of `overlay_line` over `base_line`
///
/// The base shows through left and right of the overlay's first and last
/// non-space columns. Each segment carries its own style restore and reset.
pub fn composite_line(base_line: &str, overlay_line: &str) -> String {
    let Some((left, right)) = find_content_bounds(overlay_line) else {
        return pad_to_width(base_line, ansi::display_width(overlay_line));
    };

    let mut out = pad_to_width(&ansi::truncate(base_line, left), left);
    out.push_str(&ansi::cut(overlay_line, left, right + 1));
    out.push_str(&ansi::truncate_left(base_line, right + 1));
    out
}

/// First and last non-space display columns, ignoring escape sequences
///
/// `None` for empty or all-space lines. A wide character's last column counts
/// as its right edge.
pub fn find_content_bounds(line: &str) -> Option<(usize, usize)> {
    let mut col = 0;
    let mut bounds: Option<(usize, usize)> = None;

    for token in ansi::tokenize(line) {
        let ansi::Token::Text { grapheme, width } = token else {
            continue;
        };
        if !grapheme.chars().all(char::is_whitespace) {
            let last = col + width.max(1) - 1;
            bounds = Some(match bounds {
                Some((left, _)) => (left, last),
                None => (col, last),
            });
        }
        col += width;
    }

    bounds
}

/// Exactly `height` rows of `block`
///
/// Taller blocks lose their top rows. Shorter ones are padded below.
pub fn bottom_rows(block: &TextBlock, height: usize) -> TextBlock {
    let lines = block.lines();
    let skip = lines.len().saturating_sub(height);
    let mut kept = lines[skip..].to_vec();
    kept.resize(height, String::new());
    TextBlock::from_lines(kept)
}

/// Replace the base's final line with the bar's first line
pub fn replace_bottom_line(base: &TextBlock, bar: &TextBlock) -> TextBlock {
    if base.is_empty() {
        return bar.clone();
    }
    let mut lines = base.lines().to_vec();
    if let Some(last) = lines.last_mut() {
        *last = bar.line(0).unwrap_or("").to_string();
    }
    TextBlock::from_lines(lines)
}
