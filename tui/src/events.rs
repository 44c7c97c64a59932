//! Events and Effects
//!
//! Everything that enters the loop is an [`Event`]; everything a view asks the
//! loop to do afterwards is an [`Effect`].

use std::fmt;

use crossterm::event::KeyEvent;
use futures::future::BoxFuture;
use serde_json::Value;

use crate::layers::{Focus, PanelKind};

/// A view that can receive events
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    Base,
    Panel(PanelKind),
}

impl From<Focus> for Target {
    fn from(focus: Focus) -> Self {
        match focus {
            Focus::Base => Target::Base,
            Focus::Panel(kind) => Target::Panel(kind),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Base => f.write_str("base"),
            Target::Panel(kind) => f.write_str(kind.name()),
        }
    }
}

/// Outcome of domain work, opaque to the core
#[derive(Clone, Debug, PartialEq)]
pub struct DomainResult {
    /// The view whose effect produced this result
    pub origin: Option<Target>,
    pub payload: Value,
}

impl DomainResult {
    pub fn new(payload: Value) -> Self {
        Self {
            origin: None,
            payload,
        }
    }

    pub fn from_origin(origin: Target, payload: Value) -> Self {
        Self {
            origin: Some(origin),
            payload,
        }
    }
}

/// One unit of input to the loop
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A key press, routed to the focus owner
    Key(KeyEvent),
    /// The terminal changed size
    Resize { width: u16, height: u16 },
    /// A completed effect re-entering the loop
    DomainResult(DomainResult),
}

/// Deferred work; its output comes back as [`Event::DomainResult`]
pub type Task = BoxFuture<'static, Value>;

/// Follow-up work requested by a view's `update`
pub enum Effect {
    /// Make a panel visible
    Open(PanelKind),
    /// Hide a panel
    Close(PanelKind),
    /// Queue a result as the next event
    Emit(DomainResult),
    /// Run work off the loop and deliver its output later
    Spawn(Task),
    Batch(Vec<Effect>),
    /// Stop the loop
    Quit,
}

impl Effect {
    /// Wrap an async block as a deferred effect
    pub fn spawn<F>(future: F) -> Self
    where
        F: std::future::Future<Output = Value> + Send + 'static,
    {
        Effect::Spawn(Box::pin(future))
    }

    pub fn emit(payload: Value) -> Self {
        Effect::Emit(DomainResult::new(payload))
    }
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Open(kind) => f.debug_tuple("Open").field(kind).finish(),
            Effect::Close(kind) => f.debug_tuple("Close").field(kind).finish(),
            Effect::Emit(result) => f.debug_tuple("Emit").field(result).finish(),
            Effect::Spawn(_) => f.write_str("Spawn(..)"),
            Effect::Batch(effects) => f.debug_tuple("Batch").field(effects).finish(),
            Effect::Quit => f.write_str("Quit"),
        }
    }
}
