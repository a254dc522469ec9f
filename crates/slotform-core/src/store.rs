//! Field value store: field key → current string value.
//!
//! Seeded from definition defaults whenever the widget configuration is
//! replaced, mutated by edit commits (free-text fields) and selection commits
//! (enumerated fields). Never mutated by the parser.

use std::collections::HashMap;

use smol_str::SmolStr;

use crate::types::FieldDef;

/// Mapping from field key to its current value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldValues {
    values: HashMap<SmolStr, String>,
}

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-seeded from field definitions.
    pub fn seeded(fields: &HashMap<SmolStr, FieldDef>) -> Self {
        let mut store = Self::new();
        store.initialize(fields);
        store
    }

    /// Reset every key to its definition default.
    ///
    /// Free-text fields without a default seed as the empty string. Keys from
    /// a previous configuration are dropped.
    pub fn initialize(&mut self, fields: &HashMap<SmolStr, FieldDef>) {
        self.values.clear();
        for (key, def) in fields {
            self.values.insert(key.clone(), def.default_value().to_owned());
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Write a value. Idempotent, always succeeds.
    ///
    /// Enumerated values are not validated against their options here;
    /// validation, if any, lives at the UI boundary.
    pub fn set(&mut self, key: impl Into<SmolStr>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Shallow copy of the current values.
    pub fn snapshot(&self) -> HashMap<SmolStr, String> {
        self.values.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SmolStr, &str)> {
        self.values.iter().map(|(k, v)| (k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_fields() -> HashMap<SmolStr, FieldDef> {
        let mut fields = HashMap::new();
        fields.insert(
            SmolStr::new("name"),
            FieldDef::FreeText {
                placeholder: "Your name".into(),
                default_value: String::new(),
            },
        );
        fields.insert(
            SmolStr::new("topic"),
            FieldDef::Select {
                options: vec!["A".into(), "B".into(), "C".into()],
                default_value: "A".into(),
            },
        );
        fields
    }

    #[test]
    fn initialize_seeds_defaults() {
        let store = FieldValues::seeded(&sample_fields());
        assert_eq!(store.get("name"), Some(""));
        assert_eq!(store.get("topic"), Some("A"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn set_overwrites_and_is_idempotent() {
        let mut store = FieldValues::seeded(&sample_fields());
        store.set("topic", "C");
        store.set("topic", "C");
        assert_eq!(store.get("topic"), Some("C"));
    }

    #[test]
    fn reinitialize_drops_stale_keys() {
        let mut store = FieldValues::seeded(&sample_fields());
        store.set("orphan", "x");
        store.initialize(&sample_fields());
        assert_eq!(store.get("orphan"), None);
        assert_eq!(store.get("topic"), Some("A"));
    }

    #[test]
    fn snapshot_is_detached() {
        let mut store = FieldValues::seeded(&sample_fields());
        let snap = store.snapshot();
        store.set("topic", "B");
        assert_eq!(snap.get("topic").map(String::as_str), Some("A"));
    }
}
