//! A2A message parts.
//!
//! Parts are the opaque fragments an agent answers with. The engine only looks
//! at `kind` and, for data parts, at the top-level keys of `data`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata key ADK agents use to flag a part as an internal thought.
pub const ADK_A2A_THOUGHT_KEY: &str = "adk_thought";

/// A single A2A part, tagged by `kind` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Part {
    /// Plain (markdown) text.
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metadata: Option<Map<String, Value>>,
    },
    /// Structured JSON payload; A2UI messages travel in here.
    Data {
        data: Map<String, Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metadata: Option<Map<String, Value>>,
    },
    /// File reference or inline bytes.
    File {
        file: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metadata: Option<Map<String, Value>>,
    },
}

impl Part {
    /// Creates a text part without metadata.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            metadata: None,
        }
    }

    /// Creates a data part without metadata.
    pub fn data(data: Map<String, Value>) -> Self {
        Self::Data {
            data,
            metadata: None,
        }
    }

    /// The wire `kind` of this part.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Data { .. } => "data",
            Self::File { .. } => "file",
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text { .. })
    }

    pub fn is_data(&self) -> bool {
        matches!(self, Self::Data { .. })
    }

    /// Text of a text part.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Payload of a data part.
    pub fn as_data(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Data { data, .. } => Some(data),
            _ => None,
        }
    }

    pub fn metadata(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Text { metadata, .. } | Self::Data { metadata, .. } | Self::File { metadata, .. } => {
                metadata.as_ref()
            }
        }
    }

    /// Returns true if the agent marked this part as a thought.
    ///
    /// ADK sends the flag as the string `"true"`, not a boolean.
    pub fn is_agent_thought(&self) -> bool {
        self.metadata()
            .and_then(|metadata| metadata.get(ADK_A2A_THOUGHT_KEY))
            .and_then(Value::as_str)
            == Some("true")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_part_wire_shape() {
        let part: Part = serde_json::from_value(json!({"kind": "text", "text": "hello"})).unwrap();
        assert_eq!(part.as_text(), Some("hello"));
        assert_eq!(part.kind(), "text");
        assert_eq!(
            serde_json::to_value(&part).unwrap(),
            json!({"kind": "text", "text": "hello"})
        );
    }

    #[test]
    fn test_data_part_keeps_payload() {
        let part: Part = serde_json::from_value(json!({
            "kind": "data",
            "data": {"beginRendering": {"surfaceId": "s1", "root": "root"}}
        }))
        .unwrap();
        assert!(part.is_data());
        assert!(part.as_data().unwrap().contains_key("beginRendering"));
    }

    #[test]
    fn test_agent_thought_flag() {
        let thought: Part = serde_json::from_value(json!({
            "kind": "text",
            "text": "thinking...",
            "metadata": {"adk_thought": "true"}
        }))
        .unwrap();
        assert!(thought.is_agent_thought());

        let boolean_flag: Part = serde_json::from_value(json!({
            "kind": "text",
            "text": "not a thought",
            "metadata": {"adk_thought": true}
        }))
        .unwrap();
        assert!(!boolean_flag.is_agent_thought());
        assert!(!Part::text("plain").is_agent_thought());
    }
}
