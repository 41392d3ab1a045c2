use std::sync::Arc;

use async_trait::async_trait;
use chatcanvas_core::error::Result;
use chatcanvas_core::message::UiMessageContent;
use chatcanvas_core::renderer::{
    MarkdownRenderer, RenderedContent, RendererComponent, RendererEntry, RendererHandle,
    RenderingContext, component_loader,
};
use chatcanvas_core::variant::DEFAULT_TEXT_PART_VARIANT;

/// Renders a text part through the markdown strategy.
pub struct DefaultTextPart {
    markdown: Arc<dyn MarkdownRenderer>,
}

impl DefaultTextPart {
    pub fn new(markdown: Arc<dyn MarkdownRenderer>) -> Self {
        Self { markdown }
    }
}

#[async_trait]
impl RendererComponent for DefaultTextPart {
    async fn render(
        &self,
        content: &UiMessageContent,
        _context: &RenderingContext,
    ) -> Result<RenderedContent> {
        let Some(text) = content.data.as_text() else {
            tracing::debug!(content_id = %content.id, kind = content.data.kind(), "Text renderer got a non-text part");
            return Ok(RenderedContent::Empty);
        };
        Ok(RenderedContent::Html(self.markdown.render(text).await?))
    }
}

/// Registry entry for [`DEFAULT_TEXT_PART_VARIANT`].
pub fn default_text_part_entry(markdown: Arc<dyn MarkdownRenderer>) -> RendererEntry<RendererHandle> {
    RendererEntry::new(
        DEFAULT_TEXT_PART_VARIANT,
        component_loader(move || {
            let markdown = Arc::clone(&markdown);
            async move { Ok(Arc::new(DefaultTextPart::new(markdown)) as RendererHandle) }
        }),
    )
}
