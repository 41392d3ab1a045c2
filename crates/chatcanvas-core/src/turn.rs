//! Grouping of history into turns.
//!
//! A turn is a user message followed by the agent messages that answer it.
//! Turns are derived on every read and never stored.

use std::sync::Arc;

use crate::message::{UiMessage, UiMessageContent};

/// A non-empty run of messages shown together.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    messages: Vec<Arc<UiMessage>>,
}

impl Turn {
    fn start(message: Arc<UiMessage>) -> Self {
        Self {
            messages: vec![message],
        }
    }

    pub fn messages(&self) -> &[Arc<UiMessage>] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always false; a turn holds at least its opening message.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The message that opened the turn.
    pub fn first(&self) -> &Arc<UiMessage> {
        &self.messages[0]
    }

    /// Thought contents emitted by the agent messages of this turn.
    pub fn agent_thoughts(&self) -> Vec<&UiMessageContent> {
        self.messages
            .iter()
            .filter(|message| message.role.is_agent())
            .flat_map(|message| message.contents.iter())
            .filter(|content| content.data.is_agent_thought())
            .collect()
    }
}

/// Splits `history` into turns with a single left-to-right scan.
///
/// The first message always opens a turn, whatever its role. After that an
/// agent message joins the current turn and any other message opens a new one.
pub fn group_by_turn(history: &[Arc<UiMessage>]) -> Vec<Turn> {
    let mut turns: Vec<Turn> = Vec::new();

    for message in history {
        match turns.last_mut() {
            Some(current) if message.role.is_agent() => current.messages.push(Arc::clone(message)),
            _ => turns.push(Turn::start(Arc::clone(message))),
        }
    }

    turns
}
