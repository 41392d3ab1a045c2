//! Turns history entries into rendered output.

use chatcanvas_core::error::Result;
use chatcanvas_core::message::{UiMessage, UiMessageContent};
use chatcanvas_core::renderer::{
    DecoratorHandle, LazyComponent, RenderedContent, RendererHandle, RendererRegistry,
    RenderingContext,
};

/// Renders contents with the registry and wraps messages with the optional
/// decorator.
pub struct ChatRenderer {
    registry: RendererRegistry<RendererHandle>,
    decorator: Option<LazyComponent<DecoratorHandle>>,
}

impl ChatRenderer {
    pub fn new(
        registry: RendererRegistry<RendererHandle>,
        decorator: Option<LazyComponent<DecoratorHandle>>,
    ) -> Self {
        Self {
            registry,
            decorator,
        }
    }

    pub fn registry(&self) -> &RendererRegistry<RendererHandle> {
        &self.registry
    }

    /// Renders one content; `None` when its variant has no renderer.
    ///
    /// # Errors
    ///
    /// Propagates component load failures and renderer errors.
    pub async fn render_content(
        &self,
        content: &UiMessageContent,
        context: &RenderingContext,
    ) -> Result<Option<RenderedContent>> {
        match self.registry.resolve(content).await? {
            Some(component) => component.render(content, context).await.map(Some),
            None => Ok(None),
        }
    }

    /// Renders all contents of `message` in order, skipping unrenderable ones.
    ///
    /// # Errors
    ///
    /// Propagates component and decorator failures.
    pub async fn render_message(
        &self,
        message: &UiMessage,
        context: &RenderingContext,
    ) -> Result<RenderedContent> {
        let mut inner = Vec::with_capacity(message.contents.len());
        for content in &message.contents {
            if let Some(rendered) = self.render_content(content, context).await? {
                inner.push(rendered);
            }
        }

        match &self.decorator {
            Some(decorator) => decorator.load().await?.decorate(message, inner).await,
            None => Ok(RenderedContent::Group {
                header: None,
                footer: None,
                inner,
            }),
        }
    }
}
