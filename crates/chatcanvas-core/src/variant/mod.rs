//! Variant resolution.
//!
//! A variant is a string key that picks the renderer for a part. Resolvers are
//! tried in registration order and the first match wins, so specific resolvers
//! must come before generic fallbacks.

mod resolvers;

use std::sync::Arc;

use crate::a2a::Part;

pub use resolvers::{
    A2UI_DATA_PART_VARIANT, DEFAULT_TEXT_PART_VARIANT, a2ui_data_part_resolver, default_resolvers,
    default_text_part_resolver,
};

/// Variant assigned when no resolver matched.
pub const UNRESOLVED_PART_VARIANT: &str = "unresolved_part";

/// Maps a part to a variant key, or `None` if it does not recognise the part.
///
/// Resolvers must be pure and deterministic. A panicking resolver is a bug and
/// is not caught.
pub type PartResolver = Arc<dyn Fn(&Part) -> Option<String> + Send + Sync>;

/// Wraps a closure or function as a [`PartResolver`].
pub fn part_resolver<F>(f: F) -> PartResolver
where
    F: Fn(&Part) -> Option<String> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Returns the variant of the first resolver that matches `part`.
///
/// Falls back to [`UNRESOLVED_PART_VARIANT`] when nothing matches.
pub fn resolve_variant(part: &Part, resolvers: &[PartResolver]) -> String {
    if let Some(variant) = resolvers.iter().find_map(|resolver| resolver(part)) {
        return variant;
    }

    tracing::debug!(
        kind = part.kind(),
        resolvers = resolvers.len(),
        "No resolver matched part"
    );
    UNRESOLVED_PART_VARIANT.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, json};

    fn data_part(value: serde_json::Value) -> Part {
        match value {
            serde_json::Value::Object(map) => Part::data(map),
            _ => Part::data(Map::new()),
        }
    }

    #[test]
    fn test_text_part_resolves_to_default_text() {
        for text in ["", "hello", "# heading\n\n* item"] {
            assert_eq!(
                resolve_variant(&Part::text(text), &default_resolvers()),
                DEFAULT_TEXT_PART_VARIANT
            );
        }
    }

    #[test]
    fn test_begin_rendering_resolves_to_a2ui() {
        let part = data_part(json!({"beginRendering": {"surfaceId": "s1", "root": "root"}}));
        assert_eq!(
            resolve_variant(&part, &default_resolvers()),
            A2UI_DATA_PART_VARIANT
        );
    }

    #[test]
    fn test_other_data_parts_are_unresolved() {
        let resolvers = default_resolvers();
        let parts = [
            data_part(json!({"surfaceUpdate": {"surfaceId": "s1", "components": []}})),
            data_part(json!({"dataModelUpdate": {"surfaceId": "s1", "contents": []}})),
            data_part(json!({"deleteSurface": {"surfaceId": "s1"}})),
            data_part(json!({"weather": "sunny"})),
            Part::File {
                file: json!({"uri": "https://example.com/a.png"}),
                metadata: None,
            },
        ];
        for part in parts {
            assert_eq!(resolve_variant(&part, &resolvers), UNRESOLVED_PART_VARIANT);
        }
    }

    #[test]
    fn test_resolver_order_decides() {
        let always_a = part_resolver(|_| Some("A".to_string()));
        let always_b = part_resolver(|_| Some("B".to_string()));
        let part = Part::text("same");

        assert_eq!(
            resolve_variant(&part, &[always_a.clone(), always_b.clone()]),
            "A"
        );
        assert_eq!(resolve_variant(&part, &[always_b, always_a]), "B");
    }

    #[test]
    fn test_empty_chain_is_unresolved() {
        assert_eq!(
            resolve_variant(&Part::text("hi"), &[]),
            UNRESOLVED_PART_VARIANT
        );
    }

    #[test]
    #[should_panic(expected = "broken resolver")]
    fn test_panicking_resolver_propagates() {
        let broken = part_resolver(|_| panic!("broken resolver"));
        resolve_variant(&Part::text("hi"), &[broken]);
    }
}
