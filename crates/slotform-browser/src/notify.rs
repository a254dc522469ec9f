//! Change notification: live-document snapshots and emission.
//!
//! The flattened display text reflects literal on-screen state, not the
//! template-resolved value: the editable host also permits free edits of the
//! surrounding literal text, and those must show up in notifications.

use std::rc::Rc;

use wasm_bindgen::JsCast;

use slotform_core::{ChangeSnapshot, FieldValues, strip_markers};

use crate::render::PLACEHOLDER_ATTR;

/// Fire-and-forget change listener.
///
/// Emission is isolated per call: an absent listener is a trace-level event,
/// never an error, and never interrupts the emitting controller's own state
/// mutation.
#[derive(Clone, Default)]
pub struct ChangeEmitter {
    listener: Option<Rc<dyn Fn(ChangeSnapshot)>>,
}

impl ChangeEmitter {
    pub fn new(listener: impl Fn(ChangeSnapshot) + 'static) -> Self {
        Self {
            listener: Some(Rc::new(listener)),
        }
    }

    /// An emitter with no listener attached; emits are logged and dropped.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn emit(&self, snapshot: ChangeSnapshot) {
        match &self.listener {
            Some(listener) => listener(snapshot),
            None => {
                tracing::trace!(target: "slotform::notify", "change emitted with no listener attached")
            }
        }
    }
}

/// Literal on-screen text of the editable host.
///
/// Walks every text node under `host`, skipping placeholder-companion
/// subtrees, and strips zero-width markers from the result.
pub fn display_text(host: &web_sys::Element) -> String {
    let Some(window) = web_sys::window() else {
        return String::new();
    };
    let Some(document) = window.document() else {
        return String::new();
    };

    let Ok(walker) = document.create_tree_walker_with_what_to_show(host.as_ref(), 0xFFFFFFFF)
    else {
        return String::new();
    };

    let mut text = String::new();
    let mut skip_until_exit: Option<web_sys::Element> = None;

    while let Ok(Some(node)) = walker.next_node() {
        if let Some(ref skip_elem) = skip_until_exit
            && !skip_elem.contains(Some(&node))
        {
            skip_until_exit = None;
        }

        if skip_until_exit.is_none()
            && let Some(element) = node.dyn_ref::<web_sys::Element>()
            && element.has_attribute(PLACEHOLDER_ATTR)
        {
            skip_until_exit = Some(element.clone());
            continue;
        }

        if skip_until_exit.is_some() {
            continue;
        }

        if node.node_type() != web_sys::Node::TEXT_NODE {
            continue;
        }

        if let Some(content) = node.text_content() {
            text.push_str(&content);
        }
    }

    strip_markers(&text)
}

/// Build the notification payload from the live document and the store.
pub fn live_snapshot(host: &web_sys::Element, values: &FieldValues) -> ChangeSnapshot {
    ChangeSnapshot::new(display_text(host), values)
}
