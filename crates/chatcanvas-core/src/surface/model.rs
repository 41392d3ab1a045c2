use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One node of a surface's component tree.
///
/// The engine only cares about `id`; `component` is handed to the renderer as is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentNode {
    pub id: String,
    pub component: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

/// Latest known state of an A2UI surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Surface {
    pub surface_id: String,
    pub root: Option<String>,
    pub components: HashMap<String, ComponentNode>,
    pub data_model: Value,
    pub styles: Value,
}

impl Surface {
    pub fn new(surface_id: impl Into<String>) -> Self {
        Self {
            surface_id: surface_id.into(),
            root: None,
            components: HashMap::new(),
            data_model: Value::Object(Map::new()),
            styles: Value::Null,
        }
    }

    /// The root node, once both `beginRendering` and its component arrived.
    pub fn root_node(&self) -> Option<&ComponentNode> {
        self.root.as_ref().and_then(|root| self.components.get(root))
    }

    /// Whether the surface can be drawn.
    pub fn is_renderable(&self) -> bool {
        self.root_node().is_some()
    }
}
