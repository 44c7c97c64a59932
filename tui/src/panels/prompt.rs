//! Prompt - a single-line input bar
//!
//! Used for search and command entry. Occupies the bottom row of the frame
//! and emits `{"panel": <kind>, "input": <text>}` when submitted.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyModifiers};
use serde_json::json;

use crate::compositor::ansi;
use crate::events::{Effect, Event};
use crate::geometry::pad_to_width;
use crate::layers::{Panel, PanelKind, Surface};
use crate::theme::Theme;
use crate::widgets::TextBlock;

pub struct Prompt {
    kind: PanelKind,
    label: String,
    input: String,
    visible: bool,
    width: u16,
    theme: Arc<Theme>,
}

impl Prompt {
    pub fn new(kind: PanelKind, label: impl Into<String>, theme: Arc<Theme>) -> Self {
        Self {
            kind,
            label: label.into(),
            input: String::new(),
            visible: false,
            width: 0,
            theme,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    fn dismiss(&mut self) {
        self.input.clear();
        self.visible = false;
    }
}

impl Surface for Prompt {
    fn set_size(&mut self, width: u16, _height: u16) {
        self.width = width;
    }

    fn update(&mut self, event: &Event) -> Option<Effect> {
        let Event::Key(key) = event else {
            return None;
        };

        match key.code {
            KeyCode::Esc => {
                self.dismiss();
                None
            }
            KeyCode::Enter => {
                let input = std::mem::take(&mut self.input);
                self.visible = false;
                tracing::debug!(panel = self.kind.name(), "Prompt submitted");
                Some(Effect::emit(json!({
                    "panel": self.kind.name(),
                    "input": input,
                })))
            }
            KeyCode::Backspace => {
                self.input.pop();
                None
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.clear();
                None
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.push(c);
                None
            }
            _ => None,
        }
    }

    fn view(&self) -> TextBlock {
        let label = self.theme.paint(self.theme.accent, &self.label);
        let line = format!("{label} {}_", self.input);
        let width = usize::from(self.width);

        // Keep the cursor end of long input in view
        let full = ansi::display_width(&line);
        let line = if width > 0 && full > width {
            ansi::truncate_left(&line, full - width)
        } else {
            pad_to_width(&line, width)
        };
        TextBlock::from_lines([line])
    }
}

impl Panel for Prompt {
    fn kind(&self) -> PanelKind {
        self.kind
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}
