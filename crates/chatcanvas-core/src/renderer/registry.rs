//! Variant → component lookup.

use std::collections::HashMap;

use super::lazy::{ComponentLoader, LazyComponent};
use crate::error::Result;
use crate::message::UiMessageContent;

/// A `(variant, loader)` registration.
pub struct RendererEntry<C> {
    pub variant: String,
    pub loader: ComponentLoader<C>,
}

impl<C> Clone for RendererEntry<C> {
    fn clone(&self) -> Self {
        Self {
            variant: self.variant.clone(),
            loader: self.loader.clone(),
        }
    }
}

impl<C> RendererEntry<C> {
    pub fn new(variant: impl Into<String>, loader: ComponentLoader<C>) -> Self {
        Self {
            variant: variant.into(),
            loader,
        }
    }
}

/// Immutable map from variant to lazily loaded component.
///
/// Built once from an ordered entry list. Each variant owns one memoized
/// [`LazyComponent`], so a component is loaded at most once per registry.
pub struct RendererRegistry<C> {
    components: HashMap<String, LazyComponent<C>>,
}

impl<C> RendererRegistry<C>
where
    C: Clone + Send + Sync + 'static,
{
    /// Builds the registry. A variant registered twice keeps its last entry.
    ///
    /// Never fails; duplicates produce one warning listing the variants.
    pub fn new(entries: impl IntoIterator<Item = RendererEntry<C>>) -> Self {
        let mut components = HashMap::new();
        let mut duplicates = Vec::new();

        for entry in entries {
            let lazy = LazyComponent::new(entry.variant.clone(), entry.loader);
            if components.insert(entry.variant.clone(), lazy).is_some() {
                duplicates.push(entry.variant);
            }
        }

        if !duplicates.is_empty() {
            tracing::warn!(
                variants = ?duplicates,
                "Duplicate renderer names found, using only the last one"
            );
        }

        Self { components }
    }

    pub fn lookup(&self, variant: &str) -> Option<LazyComponent<C>> {
        self.components.get(variant).cloned()
    }

    pub fn contains(&self, variant: &str) -> bool {
        self.components.contains_key(variant)
    }

    pub fn variants(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Loads the component for `content`'s variant.
    ///
    /// Returns `Ok(None)` and logs a warning when no renderer is registered.
    ///
    /// # Errors
    ///
    /// Propagates loader failures as `ChatCanvasError::ComponentLoad`.
    pub async fn resolve(&self, content: &UiMessageContent) -> Result<Option<C>> {
        let Some(lazy) = self.components.get(&content.variant) else {
            tracing::warn!(variant = %content.variant, "No renderer found for variant");
            return Ok(None);
        };
        lazy.load().await.map(Some)
    }
}
