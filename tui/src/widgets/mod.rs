//! Widgets
//!
//! Text containers passed between views and the compositor.

mod text_block;

pub use text_block::{Frame, TextBlock};
