//! Host-facing configuration types for the template input widget.
//!
//! These types are framework-agnostic. A `TemplateConfig` is the single unit
//! of configuration: swapping it out at the widget boundary triggers a full
//! reset (re-parse, re-seed values, rebuild the live document).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// A single placeholder's definition.
///
/// Serialized with the host wire shapes:
/// `{"type":"input","placeholder":"...","defaultValue":"..."}` and
/// `{"type":"select","options":[...],"defaultValue":"..."}`.
/// No other shapes are recognized.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FieldDef {
    /// Free-text field, rendered as an inline editable span.
    #[serde(rename = "input", rename_all = "camelCase")]
    FreeText {
        /// Hint shown while the field has no real content.
        #[serde(default)]
        placeholder: String,
        #[serde(default)]
        default_value: String,
    },
    /// Enumerated field, rendered as an inline dropdown selector.
    ///
    /// `default_value` should be a member of `options`; violations are
    /// tolerated and displayed as literal text.
    #[serde(rename = "select", rename_all = "camelCase")]
    Select {
        options: Vec<String>,
        #[serde(default)]
        default_value: String,
    },
}

impl FieldDef {
    /// The value a freshly seeded store entry gets for this field.
    pub fn default_value(&self) -> &str {
        match self {
            FieldDef::FreeText { default_value, .. } => default_value,
            FieldDef::Select { default_value, .. } => default_value,
        }
    }

    /// Placeholder hint for free-text fields, empty otherwise.
    pub fn placeholder_text(&self) -> &str {
        match self {
            FieldDef::FreeText { placeholder, .. } => placeholder,
            FieldDef::Select { .. } => "",
        }
    }

    /// Options of an enumerated field, empty slice for free-text.
    pub fn options(&self) -> &[String] {
        match self {
            FieldDef::FreeText { .. } => &[],
            FieldDef::Select { options, .. } => options,
        }
    }

    pub fn is_select(&self) -> bool {
        matches!(self, FieldDef::Select { .. })
    }
}

/// Widget configuration: the template plus its field definitions.
///
/// Every `{key}` occurrence in `template` whose key is absent from `fields`
/// renders as inert literal text, not an error.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateConfig {
    pub template: String,
    #[serde(default)]
    pub fields: HashMap<SmolStr, FieldDef>,
}

impl TemplateConfig {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            fields: HashMap::new(),
        }
    }

    /// Builder-style field registration, mostly for tests and demos.
    pub fn with_field(mut self, key: impl Into<SmolStr>, def: FieldDef) -> Self {
        self.fields.insert(key.into(), def);
        self
    }
}
