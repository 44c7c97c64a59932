//! Runtime errors
//!
//! Rendering itself never fails; only handing frames to the terminal can.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    /// Writing a frame to the render sink failed
    #[error("Failed to present frame: {0}")]
    Io(#[from] std::io::Error),
}
