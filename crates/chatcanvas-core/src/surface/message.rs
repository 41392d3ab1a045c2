//! A2UI wire messages (v0.8).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::model::ComponentNode;
use crate::a2a::Part;

/// Top-level keys that mark a data part as an A2UI message.
pub const A2UI_MESSAGE_KEYS: [&str; 4] = [
    "beginRendering",
    "surfaceUpdate",
    "dataModelUpdate",
    "deleteSurface",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeginRendering {
    pub surface_id: String,
    pub root: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceUpdate {
    pub surface_id: String,
    #[serde(default)]
    pub components: Vec<ComponentNode>,
}

/// Data model patch. `contents` is a list of typed key/value entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataModelUpdate {
    pub surface_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub contents: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSurface {
    pub surface_id: String,
}

/// A message from the agent to the surface renderer.
///
/// On the wire exactly one of the four keys is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ServerToClientMessage {
    BeginRendering(BeginRendering),
    SurfaceUpdate(SurfaceUpdate),
    DataModelUpdate(DataModelUpdate),
    DeleteSurface(DeleteSurface),
}

impl ServerToClientMessage {
    pub fn surface_id(&self) -> &str {
        match self {
            Self::BeginRendering(m) => &m.surface_id,
            Self::SurfaceUpdate(m) => &m.surface_id,
            Self::DataModelUpdate(m) => &m.surface_id,
            Self::DeleteSurface(m) => &m.surface_id,
        }
    }
}

/// A user interaction on a rendered surface, sent back to the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAction {
    pub name: String,
    pub surface_id: String,
    pub source_component_id: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub context: Map<String, Value>,
}

/// Envelope of messages from the client to the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClientToServerMessage {
    UserAction(UserAction),
}

/// Returns true if the data part carries one of the A2UI message keys.
pub fn is_a2ui_part(part: &Part) -> bool {
    part.as_data()
        .is_some_and(|data| A2UI_MESSAGE_KEYS.iter().any(|key| data.contains_key(*key)))
}

/// Collects the A2UI messages contained in `parts`, in order.
///
/// Parts that look like A2UI but fail to decode are skipped with a warning.
pub fn extract_a2ui_messages(parts: &[Part]) -> Vec<ServerToClientMessage> {
    parts
        .iter()
        .filter(|part| is_a2ui_part(part))
        .filter_map(|part| {
            let data = part.as_data()?;
            match serde_json::from_value::<ServerToClientMessage>(Value::Object(data.clone())) {
                Ok(message) => Some(message),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping malformed A2UI message");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn part(value: Value) -> Part {
        serde_json::from_value(json!({"kind": "data", "data": value})).unwrap()
    }

    #[test]
    fn test_extract_skips_non_a2ui_parts() {
        let parts = vec![
            Part::text("hello"),
            part(json!({"beginRendering": {"surfaceId": "s1", "root": "root"}})),
            part(json!({"weather": "sunny"})),
            part(json!({"deleteSurface": {"surfaceId": "s0"}})),
        ];

        let messages = extract_a2ui_messages(&parts);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].surface_id(), "s1");
        assert!(matches!(messages[1], ServerToClientMessage::DeleteSurface(_)));
    }

    #[test]
    fn test_extract_skips_malformed_message() {
        let parts = vec![part(json!({"surfaceUpdate": {"components": []}}))];
        assert!(is_a2ui_part(&parts[0]));
        assert!(extract_a2ui_messages(&parts).is_empty());
    }

    #[test]
    fn test_user_action_envelope() {
        let action = ClientToServerMessage::UserAction(UserAction {
            name: "submit".to_string(),
            surface_id: "s1".to_string(),
            source_component_id: "button".to_string(),
            timestamp: chrono::Utc::now(),
            context: Map::new(),
        });
        let value = serde_json::to_value(&action).unwrap();
        assert_eq!(value["userAction"]["surfaceId"], "s1");
        assert_eq!(value["userAction"]["sourceComponentId"], "button");
    }
}
