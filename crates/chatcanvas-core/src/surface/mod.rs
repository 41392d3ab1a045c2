//! A2UI surfaces: wire messages, state, and the processor applying one to the other.

mod message;
mod model;
mod processor;

pub use message::{
    A2UI_MESSAGE_KEYS, BeginRendering, ClientToServerMessage, DataModelUpdate, DeleteSurface,
    ServerToClientMessage, SurfaceUpdate, UserAction, extract_a2ui_messages, is_a2ui_part,
};
pub use model::{ComponentNode, Surface};
pub use processor::{InMemorySurfaceProcessor, SurfaceProcessor};
