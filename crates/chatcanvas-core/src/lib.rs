//! Domain of ChatCanvas: classifying agent parts into renderer variants,
//! the chat message model, turns, surfaces and the canvas slot.

pub mod a2a;
pub mod canvas;
pub mod config;
pub mod error;
pub mod message;
pub mod renderer;
pub mod surface;
pub mod turn;
pub mod variant;

// Re-export common error type
pub use error::{ChatCanvasError, Result};
