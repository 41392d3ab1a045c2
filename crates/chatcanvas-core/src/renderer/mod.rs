//! Renderer registry and the component contracts it serves.

mod component;
mod lazy;
mod registry;

pub use component::{
    DecoratorHandle, MarkdownRenderer, MessageDecorator, PassthroughMarkdownRenderer,
    RenderedContent, RendererComponent, RendererHandle, RenderingContext,
};
pub use lazy::{ComponentLoader, LazyComponent, component_loader};
pub use registry::{RendererEntry, RendererRegistry};
