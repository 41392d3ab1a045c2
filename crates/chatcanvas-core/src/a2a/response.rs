//! Shapes of a successful `message/send` answer.
//!
//! Only the fields needed to fold a response into history are modelled; the
//! rest of the payload is ignored on deserialization.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::agent_card::AgentCard;
use super::part::Part;

/// Result metadata key carrying the agent card of the sub-agent that answered.
pub const A2A_SUBAGENT_KEY: &str = "a2a_subagent";

/// A2A message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(default)]
    pub message_id: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

/// Output artifact attached to a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    #[serde(default)]
    pub artifact_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

/// Status block of a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatus {
    #[serde(default)]
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// A2A task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub context_id: String,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<Vec<Artifact>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

/// Either a task or a direct message, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SendMessageResult {
    Task(Task),
    Message(Message),
}

impl SendMessageResult {
    pub fn metadata(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Task(task) => task.metadata.as_ref(),
            Self::Message(message) => message.metadata.as_ref(),
        }
    }

    pub fn context_id(&self) -> Option<&str> {
        match self {
            Self::Task(task) if !task.context_id.is_empty() => Some(&task.context_id),
            Self::Task(_) => None,
            Self::Message(message) => message.context_id.as_deref(),
        }
    }
}

/// Successful answer of the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendMessageSuccessResponse {
    pub result: SendMessageResult,
    /// Context id echoed by proxies that track conversations themselves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,
}

impl SendMessageSuccessResponse {
    pub fn new(result: SendMessageResult) -> Self {
        Self {
            result,
            context_id: None,
        }
    }

    /// Convenience constructor for an agent message made of `parts`.
    pub fn from_parts(parts: Vec<Part>) -> Self {
        Self::new(SendMessageResult::Message(Message {
            message_id: uuid::Uuid::new_v4().to_string(),
            role: "agent".to_string(),
            parts,
            context_id: None,
            task_id: None,
            metadata: None,
        }))
    }

    /// All parts contained in the response, in display order.
    ///
    /// For a task the status message parts come first, followed by the parts
    /// of every artifact in artifact order.
    pub fn parts(&self) -> Vec<Part> {
        match &self.result {
            SendMessageResult::Task(task) => {
                let status_parts = task
                    .status
                    .message
                    .iter()
                    .flat_map(|message| message.parts.iter().cloned());
                let artifact_parts = task
                    .artifacts
                    .iter()
                    .flatten()
                    .flat_map(|artifact| artifact.parts.iter().cloned());
                status_parts.chain(artifact_parts).collect()
            }
            SendMessageResult::Message(message) => message.parts.clone(),
        }
    }

    /// Sub-agent card carried in the result metadata, if any.
    pub fn subagent(&self) -> Option<AgentCard> {
        let value = self.result.metadata()?.get(A2A_SUBAGENT_KEY)?;
        match serde_json::from_value::<AgentCard>(value.clone()) {
            Ok(card) => Some(card),
            Err(e) => {
                tracing::debug!(error = %e, "ignoring malformed sub-agent metadata");
                None
            }
        }
    }

    /// Context id from the envelope, falling back to the result.
    pub fn context_id(&self) -> Option<&str> {
        self.context_id.as_deref().or_else(|| self.result.context_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_task_parts_status_first_then_artifacts() {
        let response: SendMessageSuccessResponse = serde_json::from_value(json!({
            "result": {
                "kind": "task",
                "id": "t1",
                "contextId": "ctx-1",
                "status": {
                    "state": "completed",
                    "message": {
                        "kind": "message",
                        "messageId": "m1",
                        "role": "agent",
                        "parts": [{"kind": "text", "text": "status"}]
                    }
                },
                "artifacts": [
                    {"artifactId": "a1", "parts": [{"kind": "text", "text": "first"}]},
                    {"artifactId": "a2", "parts": [
                        {"kind": "data", "data": {"beginRendering": {"surfaceId": "s"}}},
                        {"kind": "text", "text": "second"}
                    ]}
                ]
            }
        }))
        .unwrap();

        let parts = response.parts();
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0].as_text(), Some("status"));
        assert_eq!(parts[1].as_text(), Some("first"));
        assert!(parts[2].is_data());
        assert_eq!(parts[3].as_text(), Some("second"));
        assert_eq!(response.context_id(), Some("ctx-1"));
    }

    #[test]
    fn test_task_without_status_message_or_artifacts() {
        let response: SendMessageSuccessResponse = serde_json::from_value(json!({
            "result": {"kind": "task", "id": "t1", "status": {"state": "working"}}
        }))
        .unwrap();
        assert!(response.parts().is_empty());
        assert_eq!(response.context_id(), None);
    }

    #[test]
    fn test_message_parts_and_subagent() {
        let response: SendMessageSuccessResponse = serde_json::from_value(json!({
            "result": {
                "kind": "message",
                "messageId": "m1",
                "role": "agent",
                "parts": [{"kind": "text", "text": "hi"}],
                "metadata": {"a2a_subagent": {"name": "Charts", "iconUrl": "charts.png"}}
            },
            "context_id": "envelope-ctx"
        }))
        .unwrap();

        assert_eq!(response.parts().len(), 1);
        let subagent = response.subagent().unwrap();
        assert_eq!(subagent.name, "Charts");
        assert_eq!(subagent.icon_url.as_deref(), Some("charts.png"));
        assert_eq!(response.context_id(), Some("envelope-ctx"));
    }
}
