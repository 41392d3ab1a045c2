//! Assembly of a chat canvas from its collaborators.
//!
//! Built-in resolvers and renderers are always registered first; everything
//! passed to the builder is appended after them in call order.

use std::sync::Arc;

use chatcanvas_core::a2a::A2aService;
use chatcanvas_core::canvas::CanvasBridge;
use chatcanvas_core::config::AgentConfig;
use chatcanvas_core::renderer::{
    ComponentLoader, DecoratorHandle, LazyComponent, MarkdownRenderer,
    PassthroughMarkdownRenderer, RendererEntry, RendererHandle, RendererRegistry,
};
use chatcanvas_core::surface::SurfaceProcessor;
use chatcanvas_core::variant::{PartResolver, default_resolvers};

use crate::catalog::default_renderers;
use crate::session::{AgentCardCache, ConversationSession};
use crate::view::ChatRenderer;

/// Key of the message decorator in logs and load errors.
const MESSAGE_DECORATOR_KEY: &str = "message_decorator";

/// Everything a frontend needs to drive and draw a conversation.
pub struct ChatCanvas {
    pub session: Arc<ConversationSession>,
    pub renderer: ChatRenderer,
    pub canvas: Arc<CanvasBridge>,
}

/// Builder for [`ChatCanvas`].
pub struct ChatCanvasBuilder {
    service: Arc<dyn A2aService>,
    resolvers: Vec<PartResolver>,
    renderers: Vec<RendererEntry<RendererHandle>>,
    markdown: Arc<dyn MarkdownRenderer>,
    decorator: Option<ComponentLoader<DecoratorHandle>>,
    canvas: Option<Arc<CanvasBridge>>,
    surface_processor: Option<Box<dyn SurfaceProcessor>>,
    agent_card: Option<AgentCardCache>,
    default_agent: Option<(String, String)>,
}

impl ChatCanvasBuilder {
    pub fn new(service: Arc<dyn A2aService>) -> Self {
        Self {
            service,
            resolvers: Vec::new(),
            renderers: Vec::new(),
            markdown: Arc::new(PassthroughMarkdownRenderer),
            decorator: None,
            canvas: None,
            surface_processor: None,
            agent_card: None,
            default_agent: None,
        }
    }

    /// Builder seeded with the fallback identity from `config`.
    pub fn from_config(service: Arc<dyn A2aService>, config: &AgentConfig) -> Self {
        Self::new(service).using_default_agent(&config.default_name, &config.default_icon_url)
    }

    /// Appends resolvers after the built-in ones.
    pub fn using_part_resolvers(mut self, resolvers: impl IntoIterator<Item = PartResolver>) -> Self {
        self.resolvers.extend(resolvers);
        self
    }

    /// Appends renderer entries after the built-in ones. Re-registering a
    /// built-in variant overrides it.
    pub fn using_renderers(
        mut self,
        renderers: impl IntoIterator<Item = RendererEntry<RendererHandle>>,
    ) -> Self {
        self.renderers.extend(renderers);
        self
    }

    pub fn using_markdown_renderer(mut self, markdown: Arc<dyn MarkdownRenderer>) -> Self {
        self.markdown = markdown;
        self
    }

    /// Loader of a decorator wrapped around every rendered message.
    pub fn using_message_decorator(mut self, loader: ComponentLoader<DecoratorHandle>) -> Self {
        self.decorator = Some(loader);
        self
    }

    /// Shares an existing canvas bridge instead of creating one.
    pub fn using_canvas(mut self, canvas: Arc<CanvasBridge>) -> Self {
        self.canvas = Some(canvas);
        self
    }

    pub fn using_surface_processor(mut self, processor: Box<dyn SurfaceProcessor>) -> Self {
        self.surface_processor = Some(processor);
        self
    }

    /// Uses an already populated agent card cache instead of fetching one.
    pub fn using_agent_card(mut self, agent_card: AgentCardCache) -> Self {
        self.agent_card = Some(agent_card);
        self
    }

    pub fn using_default_agent(mut self, name: impl Into<String>, icon_url: impl Into<String>) -> Self {
        self.default_agent = Some((name.into(), icon_url.into()));
        self
    }

    /// Assembles the canvas and starts the agent card fetch.
    ///
    /// Must be called from within a Tokio runtime unless an agent card cache
    /// was supplied.
    pub fn build(self) -> ChatCanvas {
        let mut resolvers = default_resolvers();
        resolvers.extend(self.resolvers);
        let resolver_count = resolvers.len();

        let mut entries = default_renderers(Arc::clone(&self.markdown));
        entries.extend(self.renderers);
        let registry = RendererRegistry::new(entries);

        let decorator = self
            .decorator
            .map(|loader| LazyComponent::new(MESSAGE_DECORATOR_KEY, loader));

        let canvas = self.canvas.unwrap_or_default();
        let agent_card = self
            .agent_card
            .unwrap_or_else(|| AgentCardCache::spawn(Arc::clone(&self.service)));

        let mut session = ConversationSession::new(self.service, resolvers, agent_card)
            .with_canvas(Arc::clone(&canvas));
        if let Some((name, icon_url)) = self.default_agent {
            session = session.with_default_agent(name, icon_url);
        }
        if let Some(processor) = self.surface_processor {
            session = session.with_surface_processor(processor);
        }

        tracing::debug!(
            resolvers = resolver_count,
            renderers = registry.len(),
            decorator = decorator.is_some(),
            "Chat canvas assembled"
        );

        ChatCanvas {
            session: Arc::new(session),
            renderer: ChatRenderer::new(registry, decorator),
            canvas,
        }
    }
}
