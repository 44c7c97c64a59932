//! Stock Panels
//!
//! Ready-made [`Panel`](crate::layers::Panel) implementations for hosting
//! applications: centered [`Dialog`]s and bottom-bar [`Prompt`]s.

mod dialog;
mod prompt;

pub use dialog::Dialog;
pub use prompt::Prompt;
