use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::agent_card::AgentCard;
use super::part::Part;
use super::response::SendMessageSuccessResponse;
use crate::error::Result;

/// Transport to the upstream agent.
///
/// Implementations must observe `cancel`: once the token fires, the in-flight
/// call is dropped and `Err(ChatCanvasError::Cancelled)` is returned.
#[async_trait]
pub trait A2aService: Send + Sync {
    /// Sends `parts` as a single user message and waits for the agent's answer.
    async fn send_message(
        &self,
        parts: Vec<Part>,
        cancel: CancellationToken,
    ) -> Result<SendMessageSuccessResponse>;

    /// Fetches the agent's public description.
    async fn get_agent_card(&self) -> Result<AgentCard>;
}
