//! Chat history entries.
//!
//! A [`UiMessage`] is an immutable value once it sits in history. Folding a
//! response produces a new value via [`UiMessage::folded`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::a2a::Part;

/// Display identity of the agent that produced a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiAgent {
    pub name: String,
    pub icon_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subagent_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subagent_icon_url: Option<String>,
}

impl UiAgent {
    pub fn new(name: impl Into<String>, icon_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon_url: icon_url.into(),
            subagent_name: None,
            subagent_icon_url: None,
        }
    }

    /// Name to show in the bubble header, preferring the sub-agent.
    pub fn display_name(&self) -> &str {
        self.subagent_name.as_deref().unwrap_or(&self.name)
    }
}

/// Who authored a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Role {
    Agent(UiAgent),
    User,
}

impl Role {
    pub fn is_agent(&self) -> bool {
        matches!(self, Self::Agent(_))
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Self::User)
    }

    pub fn as_agent(&self) -> Option<&UiAgent> {
        match self {
            Self::Agent(agent) => Some(agent),
            Self::User => None,
        }
    }
}

/// Lifecycle of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    /// Placeholder waiting for the agent.
    Pending,
    Completed,
    Cancelled,
}

/// One renderable fragment of a message.
///
/// `variant` is fixed at normalization and never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiMessageContent {
    pub id: String,
    pub data: Part,
    pub variant: String,
}

/// A chat bubble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiMessage {
    pub id: String,
    /// Conversation id, empty until the agent assigns one.
    pub context_id: String,
    pub role: Role,
    pub contents: Vec<UiMessageContent>,
    pub status: MessageStatus,
    pub created: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl UiMessage {
    /// Creates a message stamped with `now` for both timestamps.
    pub fn new(
        context_id: impl Into<String>,
        role: Role,
        contents: Vec<UiMessageContent>,
        status: MessageStatus,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            context_id: context_id.into(),
            role,
            contents,
            status,
            created: now,
            last_updated: now,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == MessageStatus::Pending
    }

    /// Returns a completed copy with `extra` appended to the contents.
    ///
    /// `role` replaces the current role when given. `self` is left untouched.
    pub fn folded(&self, role: Option<Role>, extra: Vec<UiMessageContent>) -> Self {
        let mut contents = Vec::with_capacity(self.contents.len() + extra.len());
        contents.extend(self.contents.iter().cloned());
        contents.extend(extra);

        Self {
            id: self.id.clone(),
            context_id: self.context_id.clone(),
            role: role.unwrap_or_else(|| self.role.clone()),
            contents,
            status: MessageStatus::Completed,
            created: self.created,
            last_updated: Utc::now(),
        }
    }

    /// Concatenated text of all text contents, for plain-text frontends.
    pub fn plain_text(&self) -> String {
        self.contents
            .iter()
            .filter_map(|content| content.data.as_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
