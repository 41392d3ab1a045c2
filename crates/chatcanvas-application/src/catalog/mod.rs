//! Built-in renderers for text and A2UI surfaces.

mod a2ui_data_part;
mod default_text_part;

use std::sync::Arc;

use chatcanvas_core::renderer::{MarkdownRenderer, RendererEntry, RendererHandle};

pub use a2ui_data_part::{A2uiDataPart, a2ui_data_part_entry};
pub use default_text_part::{DefaultTextPart, default_text_part_entry};

/// Built-in entries, A2UI first.
pub fn default_renderers(markdown: Arc<dyn MarkdownRenderer>) -> Vec<RendererEntry<RendererHandle>> {
    vec![a2ui_data_part_entry(), default_text_part_entry(markdown)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatcanvas_core::a2a::Part;
    use chatcanvas_core::message::{convert_part_to_content, text_content};
    use chatcanvas_core::renderer::{
        PassthroughMarkdownRenderer, RenderedContent, RendererRegistry, RenderingContext,
    };
    use chatcanvas_core::surface::Surface;
    use chatcanvas_core::variant::default_resolvers;
    use serde_json::json;

    fn registry() -> RendererRegistry<RendererHandle> {
        RendererRegistry::new(default_renderers(Arc::new(PassthroughMarkdownRenderer)))
    }

    #[tokio::test]
    async fn test_text_rendered_through_markdown() {
        let content = text_content("**bold**");
        let component = registry().resolve(&content).await.unwrap().unwrap();
        let rendered = component
            .render(&content, &RenderingContext::default())
            .await
            .unwrap();
        assert_eq!(rendered, RenderedContent::Html("**bold**".to_string()));
    }

    #[tokio::test]
    async fn test_a2ui_part_looks_up_surface() {
        let part: Part = serde_json::from_value(json!({
            "kind": "data",
            "data": {"beginRendering": {"surfaceId": "s1", "root": "root"}}
        }))
        .unwrap();
        let content = convert_part_to_content(part, &default_resolvers());
        let component = registry().resolve(&content).await.unwrap().unwrap();

        let mut context = RenderingContext::default();
        let missing = component.render(&content, &context).await.unwrap();
        assert_eq!(missing, RenderedContent::Empty);

        context.surfaces.insert("s1".to_string(), Surface::new("s1"));
        match component.render(&content, &context).await.unwrap() {
            RenderedContent::Surface { surface_id, .. } => assert_eq!(surface_id, "s1"),
            other => panic!("expected surface, got {other:?}"),
        }
    }
}
