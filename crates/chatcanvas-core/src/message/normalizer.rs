use super::ui_message::UiMessageContent;
use crate::a2a::Part;
use crate::variant::{DEFAULT_TEXT_PART_VARIANT, PartResolver, resolve_variant};

/// Turns a raw part into a content with a fresh id and its resolved variant.
///
/// The part is stored unchanged.
pub fn convert_part_to_content(part: Part, resolvers: &[PartResolver]) -> UiMessageContent {
    let variant = resolve_variant(&part, resolvers);
    UiMessageContent {
        id: uuid::Uuid::new_v4().to_string(),
        data: part,
        variant,
    }
}

/// Builds a plain text content without consulting any resolver.
///
/// Used for the optimistic user bubble and for error bubbles.
pub fn text_content(text: impl Into<String>) -> UiMessageContent {
    UiMessageContent {
        id: uuid::Uuid::new_v4().to_string(),
        data: Part::text(text),
        variant: DEFAULT_TEXT_PART_VARIANT.to_string(),
    }
}
