//! Contracts between the engine and the components it loads.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::message::{UiMessage, UiMessageContent};
use crate::surface::Surface;

/// What a component sees besides its content.
#[derive(Debug, Clone, Default)]
pub struct RenderingContext {
    /// True while a request to the agent is in flight.
    pub is_stream_open: bool,
    /// Latest surface snapshot of the session.
    pub surfaces: HashMap<String, Surface>,
}

/// Output of a renderer, handed to the frontend.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedContent {
    /// Markup produced by the markdown strategy.
    Html(String),
    /// A surface to mount inline.
    Surface { surface_id: String, surface: Surface },
    /// Nothing to show, e.g. a surface that was deleted.
    Empty,
    /// Contents of one message, optionally framed by a decorator.
    Group {
        header: Option<String>,
        footer: Option<String>,
        inner: Vec<RenderedContent>,
    },
}

/// A component able to render one content variant.
#[async_trait]
pub trait RendererComponent: Send + Sync {
    async fn render(
        &self,
        content: &UiMessageContent,
        context: &RenderingContext,
    ) -> Result<RenderedContent>;
}

/// Shared handle to a loaded renderer.
pub type RendererHandle = Arc<dyn RendererComponent>;

/// Optional wrapper drawn around every message's core content.
#[async_trait]
pub trait MessageDecorator: Send + Sync {
    async fn decorate(
        &self,
        message: &UiMessage,
        core: Vec<RenderedContent>,
    ) -> Result<RenderedContent>;
}

/// Shared handle to a loaded decorator.
pub type DecoratorHandle = Arc<dyn MessageDecorator>;

/// Markdown to HTML strategy.
#[async_trait]
pub trait MarkdownRenderer: Send + Sync {
    async fn render(&self, markdown: &str) -> Result<String>;
}

/// Returns the markdown source untouched.
///
/// Useful for terminals and tests; no markdown is actually interpreted.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughMarkdownRenderer;

#[async_trait]
impl MarkdownRenderer for PassthroughMarkdownRenderer {
    async fn render(&self, markdown: &str) -> Result<String> {
        Ok(markdown.to_string())
    }
}
