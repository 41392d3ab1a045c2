//! A2A protocol shapes consumed by the engine, and the transport trait.

pub mod agent_card;
pub mod part;
pub mod response;
pub mod service;

pub use agent_card::AgentCard;
pub use part::{ADK_A2A_THOUGHT_KEY, Part};
pub use response::{
    A2A_SUBAGENT_KEY, Artifact, Message, SendMessageResult, SendMessageSuccessResponse, Task,
    TaskStatus,
};
pub use service::A2aService;
