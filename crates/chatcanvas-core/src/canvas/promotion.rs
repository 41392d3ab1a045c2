//! Detection of surfaces that ask to be shown on the canvas.
//!
//! A surface requests promotion by containing a custom `Canvas` component.
//! Its `children` are what the canvas displays.

use serde_json::Value;

use crate::surface::{ComponentNode, Surface};

/// Name of the custom A2UI component that requests canvas promotion.
pub const CANVAS_COMPONENT: &str = "Canvas";

/// Children of the surface's `Canvas` component, if it has one.
///
/// `children` may be an `explicitList` of component ids, resolved against the
/// surface, or an inline array of nodes. Unknown ids are skipped.
pub fn canvas_request(surface: &Surface) -> Option<Vec<ComponentNode>> {
    let mut candidates: Vec<&ComponentNode> = surface
        .components
        .values()
        .filter(|node| node.component.get(CANVAS_COMPONENT).is_some())
        .collect();
    // Deterministic pick when a surface carries several canvases.
    candidates.sort_by(|a, b| a.id.cmp(&b.id));
    let node = candidates.first()?;

    let children = node.component.get(CANVAS_COMPONENT)?.get("children");
    let nodes = match children {
        Some(Value::Object(map)) => map
            .get("explicitList")
            .and_then(Value::as_array)
            .map(|ids| {
                ids.iter()
                    .filter_map(Value::as_str)
                    .filter_map(|id| surface.components.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| serde_json::from_value::<ComponentNode>(item.clone()).ok())
            .collect(),
        _ => Vec::new(),
    };

    Some(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(id: &str, component: Value) -> ComponentNode {
        ComponentNode {
            id: id.to_string(),
            component,
            weight: None,
        }
    }

    #[test]
    fn test_explicit_children_resolved() {
        let mut surface = Surface::new("s1");
        for n in [
            node("canvas", json!({"Canvas": {"children": {"explicitList": ["chart", "gone"]}}})),
            node("chart", json!({"Image": {"url": {"literalString": "chart.png"}}})),
        ] {
            surface.components.insert(n.id.clone(), n);
        }

        let nodes = canvas_request(&surface).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].id, "chart");
    }

    #[test]
    fn test_inline_children() {
        let mut surface = Surface::new("s1");
        let canvas = node(
            "canvas",
            json!({"Canvas": {"children": [{"id": "t", "component": {"Text": {}}}]}}),
        );
        surface.components.insert(canvas.id.clone(), canvas);

        assert_eq!(canvas_request(&surface).unwrap()[0].id, "t");
    }

    #[test]
    fn test_surface_without_canvas() {
        let mut surface = Surface::new("s1");
        let text = node("t", json!({"Text": {}}));
        surface.components.insert(text.id.clone(), text);
        assert!(canvas_request(&surface).is_none());
    }
}
