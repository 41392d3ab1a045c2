use std::sync::Arc;

use async_trait::async_trait;
use chatcanvas_core::error::Result;
use chatcanvas_core::message::UiMessageContent;
use chatcanvas_core::renderer::{
    RenderedContent, RendererComponent, RendererEntry, RendererHandle, RenderingContext,
    component_loader,
};
use chatcanvas_core::variant::A2UI_DATA_PART_VARIANT;
use serde_json::Value;

/// Renders the surface opened by a `beginRendering` data part.
#[derive(Debug, Default)]
pub struct A2uiDataPart;

impl A2uiDataPart {
    /// `beginRendering.surfaceId` of the content's part.
    pub fn surface_id(content: &UiMessageContent) -> Option<&str> {
        content
            .data
            .as_data()?
            .get("beginRendering")?
            .get("surfaceId")
            .and_then(Value::as_str)
    }
}

#[async_trait]
impl RendererComponent for A2uiDataPart {
    async fn render(
        &self,
        content: &UiMessageContent,
        context: &RenderingContext,
    ) -> Result<RenderedContent> {
        let Some(surface_id) = Self::surface_id(content) else {
            return Ok(RenderedContent::Empty);
        };

        match context.surfaces.get(surface_id) {
            Some(surface) => Ok(RenderedContent::Surface {
                surface_id: surface_id.to_string(),
                surface: surface.clone(),
            }),
            None => {
                tracing::debug!(surface_id, "Surface no longer exists");
                Ok(RenderedContent::Empty)
            }
        }
    }
}

/// Registry entry for [`A2UI_DATA_PART_VARIANT`].
pub fn a2ui_data_part_entry() -> RendererEntry<RendererHandle> {
    RendererEntry::new(
        A2UI_DATA_PART_VARIANT,
        component_loader(|| async { Ok(Arc::new(A2uiDataPart) as RendererHandle) }),
    )
}
