//! Editable-field controller.
//!
//! Free-text field regions behave like native text boxes embedded inside a
//! larger, non-uniformly-editable document. Three responsibilities live
//! here:
//!
//! - **Empty-field invariant**: an emptied field keeps a single zero-width
//!   anchor character so the region never collapses and stays focusable.
//! - **Catch-all normalization**: a subtree `MutationObserver` picks up
//!   content changes no key handler sees (autocomplete, IME, tooling) and
//!   funnels them through the same idempotent normalization path. A
//!   reentrancy flag, cleared on the next event-loop turn, keeps the
//!   observer from re-entering on the controller's own edits.
//! - **Whole-field deletion**: a delete-class key on an empty field removes
//!   the whole region and hands the caret to the nearest surviving text.

use std::cell::Cell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use slotform_core::{ANCHOR_CHAR, DomError, SmolStr, has_real_content, strip_markers};

use crate::cursor::relocate_caret;
use crate::render::PLACEHOLDER_ATTR;

/// Result of normalizing one field instance.
#[derive(Debug, Clone)]
pub struct NormalizeOutcome {
    pub key: SmolStr,
    /// Marker-stripped field content, ready for the value store.
    pub value: String,
    /// Whether normalization performed a programmatic DOM edit.
    pub mutated: bool,
}

/// Visible text of a field region, placeholder companion excluded.
pub fn field_text(field: &web_sys::Element) -> String {
    let mut text = String::new();
    let field_node: &web_sys::Node = field.as_ref();
    let children = field_node.child_nodes();
    for i in 0..children.length() {
        let Some(child) = children.get(i) else {
            continue;
        };
        if let Some(element) = child.dyn_ref::<web_sys::Element>()
            && element.has_attribute(PLACEHOLDER_ATTR)
        {
            continue;
        }
        if let Some(content) = child.text_content() {
            text.push_str(&content);
        }
    }
    text
}

/// Normalize one free-text field instance.
///
/// Strips markers, re-establishes the single-anchor invariant when the field
/// is empty, toggles the placeholder companion, and reports the value to
/// write through to the store. Idempotent: running it again on an already
/// normalized field performs no DOM edit.
///
/// Sets `suppress` before any programmatic edit; the caller is responsible
/// for the deferred clear once the whole pass is done.
pub fn normalize_field(
    document: &web_sys::Document,
    field: &web_sys::Element,
    suppress: &Cell<bool>,
) -> Option<NormalizeOutcome> {
    let key = field.get_attribute("data-field-key")?;
    let raw = field_text(field);
    let value = strip_markers(&raw);
    let empty = value.trim().is_empty();
    let mut mutated = false;

    if empty && !is_bare_anchor(&raw) {
        suppress.set(true);
        clear_field_content(field);
        let anchor = document.create_text_node(&ANCHOR_CHAR.to_string());
        let anchor_node: &web_sys::Node = anchor.as_ref();
        let field_node: &web_sys::Node = field.as_ref();
        if field_node.append_child(anchor_node).is_err() {
            tracing::debug!(target: "slotform::field", key = %key, "anchor insertion failed");
        }
        mutated = true;
    }

    toggle_placeholder(field, !empty);

    Some(NormalizeOutcome {
        key: SmolStr::new(key),
        value,
        mutated,
    })
}

/// Whether the raw field text is already exactly one anchor character.
fn is_bare_anchor(raw: &str) -> bool {
    let mut chars = raw.chars();
    chars.next() == Some(ANCHOR_CHAR) && chars.next().is_none()
}

/// Remove every child that is not the placeholder companion.
fn clear_field_content(field: &web_sys::Element) {
    let field_node: &web_sys::Node = field.as_ref();
    let mut child = field_node.first_child();
    while let Some(node) = child {
        child = node.next_sibling();
        let is_placeholder = node
            .dyn_ref::<web_sys::Element>()
            .map(|e| e.has_attribute(PLACEHOLDER_ATTR))
            .unwrap_or(false);
        if !is_placeholder {
            let _ = field_node.remove_child(&node);
        }
    }
}

/// Show or hide the placeholder companion.
///
/// Class toggles are not observed (the observer watches structure and
/// character data only), so no suppression is needed here.
fn toggle_placeholder(field: &web_sys::Element, has_content: bool) {
    let Ok(Some(ph)) = field.query_selector(&format!("[{PLACEHOLDER_ATTR}]")) else {
        return;
    };
    let class_list = ph.class_list();
    if has_content {
        let _ = class_list.add_1("hidden");
    } else {
        let _ = class_list.remove_1("hidden");
    }
}

/// Handle a delete-class key press.
///
/// If the caret sits inside a free-text field that is empty (after marker
/// stripping), the default editing behavior is intercepted, the whole field
/// region (placeholder included) is removed, and the caret is relocated to
/// the nearest surviving text position. Returns whether the key was
/// consumed; the caller owns suppression release and re-notification.
pub fn handle_delete_key(
    event: &web_sys::KeyboardEvent,
    host: &web_sys::Element,
    suppress: &Cell<bool>,
) -> bool {
    let key = event.key();
    if key != "Backspace" && key != "Delete" {
        return false;
    }

    let Some(field) = field_at_selection(host) else {
        return false;
    };
    if has_real_content(&field_text(&field)) {
        return false;
    }

    let field_id = field.id();
    event.prevent_default();
    suppress.set(true);

    let field_node: &web_sys::Node = field.as_ref();
    let prev = field_node.previous_sibling();
    let next = field_node.next_sibling();
    field.remove();

    let host_node: &web_sys::Node = host.as_ref();
    relocate_caret(prev.as_ref(), next.as_ref(), host_node);

    tracing::debug!(target: "slotform::field", field_id = %field_id, "removed empty field region");
    true
}

/// The free-text field element containing the current selection anchor, if
/// the anchor sits inside `host`.
fn field_at_selection(host: &web_sys::Element) -> Option<web_sys::Element> {
    let selection = web_sys::window()?.get_selection().ok()??;
    let mut node = selection.anchor_node()?;
    let host_node: &web_sys::Node = host.as_ref();
    if !host_node.contains(Some(&node)) {
        return None;
    }

    loop {
        if let Some(element) = node.dyn_ref::<web_sys::Element>() {
            if element == host {
                return None;
            }
            if element.get_attribute("data-field-kind").as_deref() == Some("input") {
                return Some(element.clone());
            }
        }
        node = node.parent_node()?;
    }
}

/// Subtree mutation observer with a held callback.
///
/// Watches structural and character-data changes under the editable host.
/// Disconnects on drop.
pub struct SubtreeObserver {
    observer: web_sys::MutationObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, web_sys::MutationObserver)>,
}

impl SubtreeObserver {
    pub fn attach(
        target: &web_sys::Node,
        mut on_mutations: impl FnMut() + 'static,
    ) -> Result<Self, DomError> {
        let callback = Closure::wrap(Box::new(
            move |_records: js_sys::Array, _observer: web_sys::MutationObserver| {
                on_mutations();
            },
        )
            as Box<dyn FnMut(js_sys::Array, web_sys::MutationObserver)>);

        let observer = web_sys::MutationObserver::new(callback.as_ref().unchecked_ref())
            .map_err(|e| format!("MutationObserver::new failed: {:?}", e))?;

        let init = web_sys::MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        init.set_character_data(true);

        observer
            .observe_with_options(target, &init)
            .map_err(|e| format!("observe failed: {:?}", e))?;

        Ok(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Drop for SubtreeObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
