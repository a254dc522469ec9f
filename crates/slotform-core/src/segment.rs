//! Template parsing into renderable segments.
//!
//! A template is a plain string with `{key}` placeholders. Parsing is a pure
//! function over the template, the field definitions and the current value
//! store; it is safe to re-run any number of times.

use std::collections::HashMap;

use smol_str::SmolStr;

use crate::store::FieldValues;
use crate::types::FieldDef;

/// One renderable piece of a parsed template.
#[derive(Clone, Debug, PartialEq)]
pub enum Segment {
    /// Literal text between placeholders. Unknown `{key}` occurrences are
    /// folded in here verbatim.
    Text(String),
    /// A known `{key}` placeholder.
    Field {
        key: SmolStr,
        def: FieldDef,
        /// Current display text: store value, else default, else `[key]`.
        resolved: String,
    },
}

impl Segment {
    /// The display text this segment contributes to the flattened string.
    pub fn display(&self) -> &str {
        match self {
            Segment::Text(content) => content,
            Segment::Field { resolved, .. } => resolved,
        }
    }
}

/// Parse a template into an ordered segment list.
///
/// Scans left to right for `{` + one-or-more non-`}` characters + `}`. A
/// match whose key exists in `fields` becomes a [`Segment::Field`]; an
/// unknown key stays literal text, merged with its surroundings. A stray `{`
/// that never closes passes through verbatim. No nested or escaped-brace
/// syntax exists.
pub fn parse_template(
    template: &str,
    fields: &HashMap<SmolStr, FieldDef>,
    values: &FieldValues,
) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut pos = 0;

    while let Some(open_rel) = template[pos..].find('{') {
        let open = pos + open_rel;
        literal.push_str(&template[pos..open]);

        match template[open + 1..].find('}') {
            Some(close_rel) if close_rel > 0 => {
                let close = open + 1 + close_rel;
                let key = &template[open + 1..close];
                if let Some(def) = fields.get(key) {
                    if !literal.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut literal)));
                    }
                    let resolved = resolve_content(key, def, values);
                    segments.push(Segment::Field {
                        key: SmolStr::new(key),
                        def: def.clone(),
                        resolved,
                    });
                } else {
                    tracing::trace!(target: "slotform::parse", key, "unknown placeholder key, keeping literal");
                    literal.push_str(&template[open..=close]);
                }
                pos = close + 1;
            }
            _ => {
                // `{}` or an unclosed `{`: the brace itself is literal.
                literal.push('{');
                pos = open + 1;
            }
        }
    }

    literal.push_str(&template[pos..]);
    if !literal.is_empty() {
        segments.push(Segment::Text(literal));
    }
    segments
}

/// Resolve a field's current display text.
///
/// Non-empty store value wins, then a non-empty definition default. With
/// neither, enumerated fields show the literal `[key]` and free-text fields
/// stay empty (their placeholder companion covers the empty state).
pub fn resolve_content(key: &str, def: &FieldDef, values: &FieldValues) -> String {
    if let Some(value) = values.get(key)
        && !value.is_empty()
    {
        return value.to_owned();
    }
    let default = def.default_value();
    if !default.is_empty() {
        return default.to_owned();
    }
    match def {
        FieldDef::FreeText { .. } => String::new(),
        FieldDef::Select { .. } => format!("[{key}]"),
    }
}
