//! Chat message model and part normalization.

mod normalizer;
mod ui_message;

pub use normalizer::{convert_part_to_content, text_content};
pub use ui_message::{MessageStatus, Role, UiAgent, UiMessage, UiMessageContent};
