//! Segment list → editable host child tree.
//!
//! The host element's children are built imperatively so that later
//! user-driven mutations (this is a contenteditable region) never fight a
//! declarative re-render. A full rebuild happens only on configuration
//! replacement.
//!
//! The painted tree is self-describing: field spans carry `data-field-key`
//! and `data-field-kind` attributes, so controllers resolve instances from
//! the DOM itself and survive arbitrary structural edits in between.

use slotform_core::{ANCHOR_CHAR, DomError, FieldDef, Segment, has_real_content};

/// Attribute marking the placeholder companion inside a free-text field.
/// Text under elements carrying it never counts as document content.
pub const PLACEHOLDER_ATTR: &str = "data-ph";

/// Rebuild the host's children from a parsed segment list.
///
/// Any previous content is discarded. Field spans get stable per-instance
/// ids of the form `{host_id}-f{segment_index}`.
pub fn build_segments(
    document: &web_sys::Document,
    host: &web_sys::Element,
    segments: &[Segment],
    host_id: &str,
) -> Result<(), DomError> {
    host.set_text_content(None);
    let host_node: &web_sys::Node = host.as_ref();

    for (idx, segment) in segments.iter().enumerate() {
        match segment {
            Segment::Text(content) => {
                let text = document.create_text_node(content);
                let text_node: &web_sys::Node = text.as_ref();
                host_node
                    .append_child(text_node)
                    .map_err(|e| format!("append text segment failed: {:?}", e))?;
            }
            Segment::Field { key, def, resolved } => {
                let span = build_field_span(document, key, def, resolved)?;
                span.set_id(&format!("{host_id}-f{idx}"));
                let span_node: &web_sys::Node = span.as_ref();
                host_node
                    .append_child(span_node)
                    .map_err(|e| format!("append field segment failed: {:?}", e))?;
            }
        }
    }

    tracing::debug!(
        target: "slotform::render",
        host_id,
        segments = segments.len(),
        "rebuilt segment tree"
    );
    Ok(())
}

fn build_field_span(
    document: &web_sys::Document,
    key: &str,
    def: &FieldDef,
    resolved: &str,
) -> Result<web_sys::Element, DomError> {
    let span = document
        .create_element("span")
        .map_err(|e| format!("create field span failed: {:?}", e))?;
    span.set_attribute("data-field-key", key)
        .map_err(|e| format!("set field key failed: {:?}", e))?;
    let span_node: &web_sys::Node = span.as_ref();

    match def {
        FieldDef::FreeText { placeholder, .. } => {
            set_attrs(
                &span,
                &[
                    ("data-field-kind", "input"),
                    ("class", "slotform-field slotform-input"),
                ],
            )?;

            // Placeholder companion: visible only while the field is empty,
            // excluded from editing and from display-text extraction.
            let ph = document
                .create_element("span")
                .map_err(|e| format!("create placeholder failed: {:?}", e))?;
            let ph_class = if has_real_content(resolved) {
                "slotform-placeholder hidden"
            } else {
                "slotform-placeholder"
            };
            set_attrs(
                &ph,
                &[
                    (PLACEHOLDER_ATTR, ""),
                    ("contenteditable", "false"),
                    ("class", ph_class),
                ],
            )?;
            ph.set_text_content(Some(placeholder));
            let ph_node: &web_sys::Node = ph.as_ref();
            span_node
                .append_child(ph_node)
                .map_err(|e| format!("append placeholder failed: {:?}", e))?;

            // An empty field still needs a text node to anchor the caret.
            let content = if resolved.is_empty() {
                ANCHOR_CHAR.to_string()
            } else {
                resolved.to_owned()
            };
            let text = document.create_text_node(&content);
            let text_node: &web_sys::Node = text.as_ref();
            span_node
                .append_child(text_node)
                .map_err(|e| format!("append field text failed: {:?}", e))?;
        }
        FieldDef::Select { .. } => {
            set_attrs(
                &span,
                &[
                    ("data-field-kind", "select"),
                    ("contenteditable", "false"),
                    ("class", "slotform-field slotform-select"),
                ],
            )?;
            span.set_text_content(Some(resolved));
        }
    }

    Ok(span)
}

fn set_attrs(element: &web_sys::Element, attrs: &[(&str, &str)]) -> Result<(), DomError> {
    for (name, value) in attrs {
        element
            .set_attribute(name, value)
            .map_err(|e| format!("set_attribute {} failed: {:?}", name, e))?;
    }
    Ok(())
}
