//! Application layer: the conversation session, built-in renderers, and the
//! builder wiring them to a transport.

pub mod catalog;
pub mod features;
pub mod session;
pub mod view;

pub use features::{ChatCanvas, ChatCanvasBuilder};
pub use session::{AgentCardCache, ConversationSession};
pub use view::ChatRenderer;
