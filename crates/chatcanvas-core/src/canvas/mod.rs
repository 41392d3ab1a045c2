//! Side canvas slot.
//!
//! The canvas shows at most one promoted surface. Any number of hosts can watch
//! the slot and compare their own surface id against it.

mod promotion;

use tokio::sync::watch;

use crate::surface::ComponentNode;

pub use promotion::{CANVAS_COMPONENT, canvas_request};

/// Current content of the canvas slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanvasState {
    pub surface_id: Option<String>,
    /// Stale while `surface_id` is `None`; read through [`CanvasState::open_contents`].
    pub contents: Option<Vec<ComponentNode>>,
}

impl CanvasState {
    /// Contents of the open surface, `None` while closed.
    pub fn open_contents(&self) -> Option<&[ComponentNode]> {
        self.surface_id.as_ref()?;
        self.contents.as_deref()
    }
}

/// Owner of the canvas slot.
///
/// Share it behind an `Arc`; every mutation goes through `open_surface` and
/// `close_surface`.
#[derive(Debug)]
pub struct CanvasBridge {
    state: watch::Sender<CanvasState>,
}

impl Default for CanvasBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasBridge {
    pub fn new() -> Self {
        let (state, _) = watch::channel(CanvasState::default());
        Self { state }
    }

    /// Promotes `surface_id` to the canvas, replacing whatever was open.
    pub fn open_surface(&self, surface_id: impl Into<String>, contents: &[ComponentNode]) {
        let surface_id = surface_id.into();
        tracing::debug!(surface_id = %surface_id, nodes = contents.len(), "Opening surface in canvas");
        self.state.send_replace(CanvasState {
            surface_id: Some(surface_id),
            contents: Some(contents.to_vec()),
        });
    }

    /// Closes the canvas. No-op if nothing is open.
    pub fn close_surface(&self) {
        self.state.send_if_modified(|state| {
            if state.surface_id.is_none() {
                return false;
            }
            state.surface_id = None;
            true
        });
    }

    pub fn surface_id(&self) -> Option<String> {
        self.state.borrow().surface_id.clone()
    }

    /// Contents of the open surface; `None` while the canvas is closed.
    pub fn contents(&self) -> Option<Vec<ComponentNode>> {
        self.state.borrow().open_contents().map(<[ComponentNode]>::to_vec)
    }

    /// Whether the canvas currently shows `surface_id`.
    pub fn is_open(&self, surface_id: &str) -> bool {
        self.state.borrow().surface_id.as_deref() == Some(surface_id)
    }

    pub fn snapshot(&self) -> CanvasState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every open and close.
    pub fn subscribe(&self) -> watch::Receiver<CanvasState> {
        self.state.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nodes(id: &str) -> Vec<ComponentNode> {
        vec![ComponentNode {
            id: id.to_string(),
            component: json!({"Text": {"text": {"literalString": id}}}),
            weight: None,
        }]
    }

    #[test]
    fn test_last_open_wins() {
        let bridge = CanvasBridge::new();
        bridge.open_surface("s1", &nodes("a"));
        bridge.open_surface("s2", &nodes("b"));

        assert!(!bridge.is_open("s1"));
        assert!(bridge.is_open("s2"));
        assert_eq!(bridge.contents().unwrap()[0].id, "b");
    }

    #[test]
    fn test_close_hides_contents() {
        let bridge = CanvasBridge::new();
        bridge.open_surface("s1", &nodes("a"));
        bridge.close_surface();

        assert_eq!(bridge.surface_id(), None);
        assert!(bridge.contents().is_none());
        assert!(!bridge.is_open("s1"));
    }

    #[test]
    fn test_contents_are_copied() {
        let bridge = CanvasBridge::new();
        let mut source = nodes("a");
        bridge.open_surface("s1", &source);
        source[0].id = "mutated".to_string();

        assert_eq!(bridge.contents().unwrap()[0].id, "a");
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let bridge = CanvasBridge::new();
        let mut rx = bridge.subscribe();

        bridge.open_surface("s1", &nodes("a"));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().surface_id.as_deref(), Some("s1"));

        bridge.close_surface();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().open_contents().is_none());
    }

    #[test]
    fn test_close_when_closed_does_not_notify() {
        let bridge = CanvasBridge::new();
        let rx = bridge.subscribe();
        bridge.close_surface();
        assert!(!rx.has_changed().unwrap());
    }
}
