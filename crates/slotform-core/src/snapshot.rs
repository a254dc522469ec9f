//! Invisible anchor markers and change snapshots.
//!
//! An empty free-text field keeps a single zero-width character as its sole
//! content so the region always has a text node to anchor a caret. That
//! marker must never leak into values or notifications, so every read path
//! strips it first.

use std::collections::HashMap;

use smol_str::SmolStr;

use crate::segment::{Segment, parse_template};
use crate::store::FieldValues;
use crate::types::TemplateConfig;

/// The invisible anchor kept inside empty editable fields.
pub const ANCHOR_CHAR: char = '\u{200B}';

/// WebKit occasionally substitutes a BOM for the anchor inside
/// contenteditable regions; stripping accepts both.
const BOM_CHAR: char = '\u{FEFF}';

/// Remove all marker characters from `text`.
pub fn strip_markers(text: &str) -> String {
    text.chars()
        .filter(|&c| c != ANCHOR_CHAR && c != BOM_CHAR)
        .collect()
}

/// Whether `text`, after marker stripping, trims to something non-empty.
pub fn has_real_content(text: &str) -> bool {
    !strip_markers(text).trim().is_empty()
}

/// Payload emitted to the host on every committed change.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChangeSnapshot {
    /// Literal on-screen text of the editable host, markers stripped.
    pub text: String,
    /// Shallow copy of the field value store at emit time.
    pub values: HashMap<SmolStr, String>,
}

impl ChangeSnapshot {
    pub fn new(text: String, values: &FieldValues) -> Self {
        Self {
            text,
            values: values.snapshot(),
        }
    }
}

/// Template-resolved text: the template with every known placeholder
/// replaced by its resolved content.
///
/// This is derived from the store, not the live document, so host-side edits
/// to surrounding literal text do not show up here (use the display-text
/// query for that).
pub fn resolved_text(config: &TemplateConfig, values: &FieldValues) -> String {
    parse_template(&config.template, &config.fields, values)
        .iter()
        .map(Segment::display)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldDef;

    #[test]
    fn strips_both_marker_forms() {
        assert_eq!(strip_markers("a\u{200B}b\u{FEFF}c"), "abc");
        assert_eq!(strip_markers("\u{200B}"), "");
        assert_eq!(strip_markers("plain"), "plain");
    }

    #[test]
    fn real_content_ignores_markers_and_whitespace() {
        assert!(!has_real_content("\u{200B}"));
        assert!(!has_real_content("  \u{FEFF} "));
        assert!(has_real_content("\u{200B}x"));
    }

    #[test]
    fn resolved_text_substitutes_stored_values() {
        let config = TemplateConfig::new("Hi {name}!").with_field(
            "name",
            FieldDef::FreeText {
                placeholder: "Your name".into(),
                default_value: String::new(),
            },
        );
        let mut values = FieldValues::seeded(&config.fields);
        values.set("name", "Ann");
        assert_eq!(resolved_text(&config, &values), "Hi Ann!");
    }

    #[test]
    fn snapshot_copies_store() {
        let mut values = FieldValues::new();
        values.set("k", "v");
        let snap = ChangeSnapshot::new("text".into(), &values);
        values.set("k", "w");
        assert_eq!(snap.values.get("k").map(String::as_str), Some("v"));
        assert_eq!(snap.text, "text");
    }
}
