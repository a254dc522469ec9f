//! Outside-interaction dismissal for the dropdown overlay.
//!
//! One document-level capture listener lives for the widget's mounted
//! lifetime. It is a cheap no-op while no overlay is open (the overlay
//! element simply is not in the document); when one is, any interaction
//! whose target falls outside the overlay closes it without committing.

use gloo_events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;

/// Holds the global listener; dropping removes it.
pub struct DismissGuard {
    _listener: EventListener,
}

impl DismissGuard {
    /// Install the listener. `overlay_id` identifies the overlay element
    /// when open; `on_outside` is invoked for interactions outside it.
    pub fn install(overlay_id: impl Into<String>, on_outside: impl Fn() + 'static) -> Option<Self> {
        let document = web_sys::window()?.document()?;
        let overlay_id = overlay_id.into();

        let listener = EventListener::new_with_options(
            &document,
            "pointerdown",
            EventListenerOptions::run_in_capture_phase(),
            move |event| {
                let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                    return;
                };
                // Nothing open: overlay element absent, nothing to do.
                let Some(overlay) = document.get_element_by_id(&overlay_id) else {
                    return;
                };
                let Some(target) = event.target() else {
                    return;
                };
                let Ok(node) = target.dyn_into::<web_sys::Node>() else {
                    return;
                };
                let overlay_node: &web_sys::Node = overlay.as_ref();
                if !overlay_node.contains(Some(&node)) {
                    tracing::trace!(target: "slotform::dismiss", "outside interaction, closing overlay");
                    on_outside();
                }
            },
        );

        Some(Self {
            _listener: listener,
        })
    }
}
