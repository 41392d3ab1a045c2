pub mod agent_card;
pub mod conversation;
pub mod outbox;

pub use agent_card::{AgentCardCache, AgentCardState};
pub use conversation::{CANCELLED_RESPONSE_TEXT, ConversationSession, History};
pub use outbox::{Outgoing, SessionOutbox};
