//! Demo base view for the runner binary
//!
//! A fixed shopping list with a status line. Keys open the stock panels and
//! `r`/`e` start background jobs so deferred results can be watched landing.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyModifiers};
use serde_json::{json, Value};

use panelstack_tui::panels::{Dialog, Prompt};
use panelstack_tui::{Effect, Event, LayerRegistry, PanelKind, Surface, TextBlock, Theme};

const ITEMS: &[&str] = &["eggs", "milk", "flour", "coffee", "limes", "rice"];

const HELP: &str = "\
/  search
:  command (try `quit`)
d  clear the list
r  reload in the background
e  run a job that fails
?  this help
q  quit";

/// Background jobs take long enough to open another panel meanwhile
const JOB_DELAY: Duration = Duration::from_millis(1500);

pub fn panels(theme: &Arc<Theme>) -> LayerRegistry {
    LayerRegistry::new()
        .with_panel(Box::new(Dialog::confirm(
            "Clear",
            "Remove every item from the list?",
            json!({"action": "clear"}),
            Arc::clone(theme),
        )))
        .with_panel(Box::new(Dialog::new(
            PanelKind::Error,
            "Error",
            "The background job failed. Details are on the status line.",
            Arc::clone(theme),
        )))
        .with_panel(Box::new(Dialog::new(
            PanelKind::Help,
            "Keys",
            HELP,
            Arc::clone(theme),
        )))
        .with_panel(Box::new(Prompt::new(
            PanelKind::Search,
            "/",
            Arc::clone(theme),
        )))
        .with_panel(Box::new(Prompt::new(
            PanelKind::Command,
            ":",
            Arc::clone(theme),
        )))
}

pub struct DemoView {
    items: Vec<String>,
    filter: Option<String>,
    status: String,
    height: u16,
    theme: Arc<Theme>,
}

impl DemoView {
    pub fn new(theme: Arc<Theme>) -> Self {
        Self {
            items: ITEMS.iter().map(|s| s.to_string()).collect(),
            filter: None,
            status: "press ? for help".to_string(),
            height: 0,
            theme,
        }
    }

    fn on_result(&mut self, payload: &Value) -> Option<Effect> {
        if let Some(message) = payload.get("error").and_then(Value::as_str) {
            self.status = format!("job failed: {message}");
            return Some(Effect::Open(PanelKind::Error));
        }
        if payload.get("action").and_then(Value::as_str) == Some("clear") {
            self.items.clear();
            self.status = "list cleared".to_string();
            return None;
        }
        if let Some(items) = payload.get("items").and_then(Value::as_array) {
            self.items = items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect();
            self.status = format!("reloaded {} items", self.items.len());
            return None;
        }

        let input = payload.get("input").and_then(Value::as_str).unwrap_or("");
        match payload.get("panel").and_then(Value::as_str) {
            Some("search") => {
                self.filter = (!input.is_empty()).then(|| input.to_string());
                self.status = format!("search: {input}");
                None
            }
            Some("command") if input.trim() == "quit" => Some(Effect::Quit),
            Some("command") => {
                self.status = format!("unknown command: {input}");
                None
            }
            _ => None,
        }
    }
}

impl Surface for DemoView {
    fn set_size(&mut self, _width: u16, height: u16) {
        self.height = height;
    }

    fn update(&mut self, event: &Event) -> Option<Effect> {
        match event {
            Event::Key(key) if key.modifiers.contains(KeyModifiers::CONTROL) => {
                (key.code == KeyCode::Char('c')).then_some(Effect::Quit)
            }
            Event::Key(key) => match key.code {
                KeyCode::Char('q') => Some(Effect::Quit),
                KeyCode::Char('/') => Some(Effect::Open(PanelKind::Search)),
                KeyCode::Char(':') => Some(Effect::Open(PanelKind::Command)),
                KeyCode::Char('?') => Some(Effect::Open(PanelKind::Help)),
                KeyCode::Char('d') => Some(Effect::Open(PanelKind::Confirm)),
                KeyCode::Char('r') => {
                    self.status = "reloading...".to_string();
                    Some(Effect::spawn(async {
                        tokio::time::sleep(JOB_DELAY).await;
                        json!({"items": ITEMS})
                    }))
                }
                KeyCode::Char('e') => Some(Effect::spawn(async {
                    tokio::time::sleep(JOB_DELAY).await;
                    json!({"error": "service unavailable"})
                })),
                KeyCode::Esc => {
                    self.filter = None;
                    None
                }
                _ => None,
            },
            Event::DomainResult(result) => self.on_result(&result.payload),
            Event::Resize { .. } => None,
        }
    }

    fn view(&self) -> TextBlock {
        let height = usize::from(self.height);
        let mut lines = vec![self.theme.paint(self.theme.accent, "Shopping list")];
        lines.push(String::new());

        let visible = self.items.iter().filter(|item| match &self.filter {
            Some(filter) => item.contains(filter.as_str()),
            None => true,
        });
        for item in visible {
            lines.push(format!("  • {item}"));
        }

        // Status sits on the last row, where bottom bars go
        lines.resize(height.saturating_sub(1).max(lines.len()), String::new());
        lines.push(self.theme.paint(self.theme.muted, &self.status));
        TextBlock::from_lines(lines)
    }
}
