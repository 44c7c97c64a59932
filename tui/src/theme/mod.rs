//! Theme and Colors
//!
//! One immutable theme value is built from configuration at startup and
//! shared by reference (`Arc<Theme>`) with the compositor and every panel.
//!
//! The backdrop style is what the compositor paints over the base view while
//! a centered panel is open.

use crossterm::style::{
    style, Attribute, Color, ContentStyle, SetAttribute, SetBackgroundColor, SetForegroundColor,
    Stylize,
};
use crossterm::Command;

use crate::config::Config;

// ============================================================================
// Palette
// ============================================================================

/// Accent for titles and prompts
pub const ACCENT: Color = Color::Rgb {
    r: 255,
    g: 127,
    b: 127,
};

/// Panel borders
pub const BORDER: Color = Color::Rgb {
    r: 150,
    g: 180,
    b: 255,
};

/// Secondary text
pub const MUTED: Color = Color::Rgb {
    r: 100,
    g: 100,
    b: 100,
};

/// Error panels
pub const ERROR_RED: Color = Color::Rgb { r: 255, g: 80, b: 80 };

/// Default backdrop foreground behind modals
pub const BACKDROP_GRAY: Color = Color::DarkGrey;

// ============================================================================
// Theme
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Theme {
    /// Style painted over the base view behind centered panels
    pub backdrop: ContentStyle,
    pub accent: Color,
    pub border: Color,
    pub muted: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            backdrop: ContentStyle {
                foreground_color: Some(BACKDROP_GRAY),
                attributes: Attribute::Dim.into(),
                ..ContentStyle::default()
            },
            accent: ACCENT,
            border: BORDER,
            muted: MUTED,
            error: ERROR_RED,
        }
    }
}

impl Theme {
    pub fn from_config(config: &Config) -> Self {
        let mut theme = Self::default();
        if let Some(fg) = config.backdrop_fg {
            theme.backdrop.foreground_color = Some(fg);
        }
        theme
    }

    /// The escape sequences that switch the terminal into the backdrop style
    pub fn backdrop_prefix(&self) -> String {
        escape_prefix(&self.backdrop)
    }

    /// Paint text in one of the theme colors
    pub fn paint(&self, color: Color, text: &str) -> String {
        style(text).with(color).to_string()
    }
}

/// Encode a style as the SGR sequences that enable it
pub fn escape_prefix(content_style: &ContentStyle) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    if let Some(fg) = content_style.foreground_color {
        let _ = SetForegroundColor(fg).write_ansi(&mut out);
    }
    if let Some(bg) = content_style.background_color {
        let _ = SetBackgroundColor(bg).write_ansi(&mut out);
    }
    for attribute in Attribute::iterator() {
        if content_style.attributes.has(attribute) {
            let _ = SetAttribute(attribute).write_ansi(&mut out);
        }
    }
    out
}
