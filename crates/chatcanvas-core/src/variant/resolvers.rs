use super::{PartResolver, part_resolver};
use crate::a2a::Part;

/// Variant of plain text parts rendered as markdown.
pub const DEFAULT_TEXT_PART_VARIANT: &str = "default_text_part";

/// Variant of data parts that open an A2UI surface.
pub const A2UI_DATA_PART_VARIANT: &str = "a2ui_data_part";

/// Matches every text part.
pub fn default_text_part_resolver(part: &Part) -> Option<String> {
    part.is_text().then(|| DEFAULT_TEXT_PART_VARIANT.to_string())
}

/// Matches data parts carrying a `beginRendering` message.
///
/// Only surface openings get their own bubble; updates and deletions act on
/// a surface that is already displayed.
pub fn a2ui_data_part_resolver(part: &Part) -> Option<String> {
    part.as_data()
        .filter(|data| data.contains_key("beginRendering"))
        .map(|_| A2UI_DATA_PART_VARIANT.to_string())
}

/// The built-in resolver chain: A2UI first, then text.
pub fn default_resolvers() -> Vec<PartResolver> {
    vec![
        part_resolver(a2ui_data_part_resolver),
        part_resolver(default_text_part_resolver),
    ]
}
