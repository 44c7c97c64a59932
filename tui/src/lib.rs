//! Panelstack TUI - layered panels over a terminal base view
//!
//! Renders a base view plus stacked panels (modals, bottom bars, help
//! screens) into one terminal frame, and routes every input event to exactly
//! one panel chosen by a fixed priority order.
//!
//! # Architecture
//!
//! - **Geometry**: Centering offsets and width padding
//! - **Compositor**: ANSI-aware character-level overlay merging and dimming
//! - **Layers**: Fixed-priority focus arbitration over panel visibility
//! - **Orchestrator**: Single-threaded event loop with deferred effects
//!
//! The hosted views (base view and panels) implement [`Surface`] and
//! [`Panel`]; everything they do beyond that contract is their own business.

pub mod app;
pub mod compositor;
pub mod config;
pub mod error;
pub mod events;
pub mod geometry;
pub mod layers;
pub mod panels;
pub mod tasks;
pub mod terminal;
pub mod theme;
pub mod widgets;

pub use app::Orchestrator;
pub use compositor::{CompositionRequest, Compositor, Placement};
pub use config::{load_config, Config, ConfigError, StaleResultPolicy};
pub use error::RunError;
pub use events::{DomainResult, Effect, Event, Target};
pub use geometry::Viewport;
pub use layers::{Focus, LayerRegistry, Panel, PanelKind, Surface};
pub use terminal::{RenderSink, TerminalSink};
pub use theme::Theme;
pub use widgets::{Frame, TextBlock};
