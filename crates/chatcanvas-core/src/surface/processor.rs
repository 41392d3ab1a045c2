//! Applies A2UI messages to surface state.

use std::collections::HashMap;

use serde_json::{Map, Value};

use super::message::{DataModelUpdate, ServerToClientMessage};
use super::model::Surface;

/// Consumer of A2UI messages that keeps the latest state of every surface.
pub trait SurfaceProcessor: Send + Sync {
    /// Applies `messages` in order.
    fn process_messages(&mut self, messages: &[ServerToClientMessage]);

    /// Snapshot of all live surfaces by id.
    fn surfaces(&self) -> HashMap<String, Surface>;
}

/// Keeps surfaces in a plain map.
#[derive(Debug, Default)]
pub struct InMemorySurfaceProcessor {
    surfaces: HashMap<String, Surface>,
}

impl InMemorySurfaceProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    fn surface_mut(&mut self, surface_id: &str) -> &mut Surface {
        self.surfaces
            .entry(surface_id.to_string())
            .or_insert_with(|| Surface::new(surface_id))
    }
}

impl SurfaceProcessor for InMemorySurfaceProcessor {
    fn process_messages(&mut self, messages: &[ServerToClientMessage]) {
        for message in messages {
            match message {
                ServerToClientMessage::BeginRendering(begin) => {
                    let surface = self.surface_mut(&begin.surface_id);
                    surface.root = Some(begin.root.clone());
                    if let Some(styles) = &begin.styles {
                        surface.styles = styles.clone();
                    }
                }
                ServerToClientMessage::SurfaceUpdate(update) => {
                    let surface = self.surface_mut(&update.surface_id);
                    for node in &update.components {
                        surface.components.insert(node.id.clone(), node.clone());
                    }
                }
                ServerToClientMessage::DataModelUpdate(update) => {
                    let surface = self.surface_mut(&update.surface_id);
                    apply_data_model_update(&mut surface.data_model, update);
                }
                ServerToClientMessage::DeleteSurface(delete) => {
                    if self.surfaces.remove(&delete.surface_id).is_none() {
                        tracing::debug!(surface_id = %delete.surface_id, "deleteSurface for unknown surface");
                    }
                }
            }
        }

        tracing::debug!(
            messages = messages.len(),
            surfaces = self.surfaces.len(),
            "A2UI surfaces updated"
        );
    }

    fn surfaces(&self) -> HashMap<String, Surface> {
        self.surfaces.clone()
    }
}

/// Merges the entries of `update` into the object found at `update.path`.
fn apply_data_model_update(model: &mut Value, update: &DataModelUpdate) {
    let segments: Vec<&str> = update
        .path
        .as_deref()
        .unwrap_or("/")
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();

    if let Some(target) = object_at(model, &segments) {
        target.extend(entries_to_map(&update.contents));
    }
}

/// Walks `segments` down from `value`, replacing non-objects on the way.
fn object_at<'a>(value: &'a mut Value, segments: &[&str]) -> Option<&'a mut Map<String, Value>> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    let Value::Object(map) = value else {
        return None;
    };

    match segments.split_first() {
        None => Some(map),
        Some((head, rest)) => {
            let child = map
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            object_at(child, rest)
        }
    }
}

/// Converts typed entries (`{key, valueString|valueNumber|valueBoolean|valueMap}`)
/// into a JSON object.
fn entries_to_map(entries: &[Value]) -> Map<String, Value> {
    entries
        .iter()
        .filter_map(|entry| {
            let key = entry.get("key")?.as_str()?.to_string();
            let value = if let Some(nested) = entry.get("valueMap").and_then(Value::as_array) {
                Value::Object(entries_to_map(nested))
            } else {
                ["valueString", "valueNumber", "valueBoolean"]
                    .iter()
                    .find_map(|field| entry.get(*field).cloned())?
            };
            Some((key, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn messages(values: Vec<Value>) -> Vec<ServerToClientMessage> {
        values
            .into_iter()
            .map(|value| serde_json::from_value(value).unwrap())
            .collect()
    }

    #[test]
    fn test_begin_and_update_build_surface() {
        let mut processor = InMemorySurfaceProcessor::new();
        processor.process_messages(&messages(vec![
            json!({"surfaceUpdate": {"surfaceId": "s1", "components": [
                {"id": "root", "component": {"Column": {"children": {"explicitList": ["title"]}}}},
                {"id": "title", "component": {"Text": {"text": {"literalString": "Hi"}}}}
            ]}}),
            json!({"beginRendering": {"surfaceId": "s1", "root": "root"}}),
        ]));

        let surfaces = processor.surfaces();
        let surface = &surfaces["s1"];
        assert_eq!(surface.root.as_deref(), Some("root"));
        assert_eq!(surface.components.len(), 2);
        assert!(surface.is_renderable());
        assert_eq!(surface.root_node().unwrap().id, "root");
    }

    #[test]
    fn test_data_model_update_at_path() {
        let mut processor = InMemorySurfaceProcessor::new();
        processor.process_messages(&messages(vec![
            json!({"dataModelUpdate": {"surfaceId": "s1", "contents": [
                {"key": "title", "valueString": "Menu"}
            ]}}),
            json!({"dataModelUpdate": {"surfaceId": "s1", "path": "/order", "contents": [
                {"key": "count", "valueNumber": 2},
                {"key": "item", "valueMap": [{"key": "name", "valueString": "Tea"}]}
            ]}}),
        ]));

        let model = &processor.surfaces()["s1"].data_model;
        assert_eq!(model["title"], "Menu");
        assert_eq!(model["order"]["count"], 2);
        assert_eq!(model["order"]["item"]["name"], "Tea");
    }

    #[test]
    fn test_delete_removes_surface() {
        let mut processor = InMemorySurfaceProcessor::new();
        processor.process_messages(&messages(vec![
            json!({"beginRendering": {"surfaceId": "s1", "root": "root"}}),
            json!({"beginRendering": {"surfaceId": "s2", "root": "root"}}),
            json!({"deleteSurface": {"surfaceId": "s1"}}),
            json!({"deleteSurface": {"surfaceId": "missing"}}),
        ]));

        let surfaces = processor.surfaces();
        assert_eq!(surfaces.len(), 1);
        assert!(surfaces.contains_key("s2"));
    }
}
