//! Dialog - a bordered, centered text panel
//!
//! Serves help screens, error reports and yes/no confirmations. A
//! confirmation emits its payload when accepted; every dialog hides itself
//! when dismissed.

use std::sync::Arc;

use crossterm::event::KeyCode;
use serde_json::Value;

use crate::compositor::ansi;
use crate::events::{Effect, Event};
use crate::geometry::pad_to_width;
use crate::layers::{Panel, PanelKind, Surface};
use crate::theme::Theme;
use crate::widgets::TextBlock;

const MIN_INNER_WIDTH: usize = 10;
const MAX_INNER_WIDTH: usize = 60;

pub struct Dialog {
    kind: PanelKind,
    title: String,
    body: String,
    /// Emitted when a confirmation is accepted
    on_confirm: Option<Value>,
    visible: bool,
    width: u16,
    theme: Arc<Theme>,
}

impl Dialog {
    pub fn new(
        kind: PanelKind,
        title: impl Into<String>,
        body: impl Into<String>,
        theme: Arc<Theme>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            body: body.into(),
            on_confirm: None,
            visible: false,
            width: 0,
            theme,
        }
    }

    /// A yes/no dialog that emits `payload` when accepted
    pub fn confirm(
        title: impl Into<String>,
        body: impl Into<String>,
        payload: Value,
        theme: Arc<Theme>,
    ) -> Self {
        Self {
            on_confirm: Some(payload),
            ..Self::new(PanelKind::Confirm, title, body, theme)
        }
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    fn is_confirmation(&self) -> bool {
        self.on_confirm.is_some()
    }

    fn inner_width(&self) -> usize {
        let available = usize::from(self.width).saturating_sub(4);
        let wanted = self
            .body
            .lines()
            .map(ansi::display_width)
            .chain([
                ansi::display_width(&self.title) + 2,
                ansi::display_width(self.footer()),
            ])
            .max()
            .unwrap_or(0);
        wanted
            .min(MAX_INNER_WIDTH)
            .min(available)
            .max(MIN_INNER_WIDTH)
    }

    fn footer(&self) -> &'static str {
        if self.is_confirmation() {
            "[y] yes  [n] no"
        } else {
            "[esc] close"
        }
    }
}

impl Surface for Dialog {
    fn set_size(&mut self, width: u16, _height: u16) {
        self.width = width;
    }

    fn update(&mut self, event: &Event) -> Option<Effect> {
        let Event::Key(key) = event else {
            return None;
        };

        match key.code {
            KeyCode::Enter | KeyCode::Char('y') if self.is_confirmation() => {
                self.visible = false;
                self.on_confirm.clone().map(Effect::emit)
            }
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('q') => {
                self.visible = false;
                None
            }
            KeyCode::Enter => {
                self.visible = false;
                None
            }
            _ => None,
        }
    }

    fn view(&self) -> TextBlock {
        let inner = self.inner_width();
        let border = |s: &str| self.theme.paint(self.theme.border, s);
        let title_color = if self.kind == PanelKind::Error {
            self.theme.error
        } else {
            self.theme.accent
        };

        let title = ansi::truncate(&format!(" {} ", self.title), inner);
        let fill = (inner + 2).saturating_sub(1 + ansi::display_width(&title));

        let mut lines = Vec::new();
        lines.push(format!(
            "{}{}{}",
            border("╭─"),
            self.theme.paint(title_color, &title),
            border(&format!("{}╮", "─".repeat(fill)))
        ));

        let side = border("│");
        let mut row = |content: String| {
            lines.push(format!("{side} {} {side}", pad_to_width(&content, inner)));
        };

        for paragraph in self.body.lines() {
            if paragraph.is_empty() {
                row(String::new());
                continue;
            }
            for wrapped in textwrap::wrap(paragraph, inner) {
                row(wrapped.into_owned());
            }
        }
        row(String::new());
        row(self
            .theme
            .paint(self.theme.muted, &ansi::truncate(self.footer(), inner)));

        lines.push(border(&format!("╰{}╯", "─".repeat(inner + 2))));
        TextBlock::from_lines(lines)
    }
}

impl Panel for Dialog {
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
