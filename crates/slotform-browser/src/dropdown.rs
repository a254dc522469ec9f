//! Dropdown overlay measurement and optimistic selection painting.
//!
//! The clamping rules live in `slotform_core::overlay`; this module only
//! measures rects and scroll state, all relative to the widget's own
//! container so the overlay behaves correctly inside scrollable ancestors.

use std::cell::Cell;

use wasm_bindgen::JsCast;

use slotform_core::{OVERLAY_GAP, OVERLAY_MARGIN, OverlayPosition, Rect, Size, SmolStr};

use crate::schedule;

/// State of the (at most one) open dropdown.
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveDropdown {
    pub key: SmolStr,
    /// Element id of the clicked field span the overlay anchors to.
    pub anchor_id: String,
    pub options: Vec<String>,
    /// False until the overlay was painted and positioned.
    pub visible: bool,
    pub position: Option<OverlayPosition>,
}

impl ActiveDropdown {
    pub fn open(key: SmolStr, anchor_id: String, options: Vec<String>) -> Self {
        Self {
            key,
            anchor_id,
            options,
            visible: false,
            position: None,
        }
    }
}

/// Measure the painted overlay against its anchor and container.
///
/// All three elements must be in the document; a missing one yields `None`
/// (the caller no-ops). The result is in container-content coordinates
/// (scroll offsets folded in), clamped by
/// [`OverlayPosition::compute`].
pub fn measure_overlay(
    container_id: &str,
    anchor_id: &str,
    overlay_id: &str,
) -> Option<OverlayPosition> {
    let document = web_sys::window()?.document()?;
    let container = document.get_element_by_id(container_id)?;
    let anchor = document.get_element_by_id(anchor_id)?;
    let overlay = document.get_element_by_id(overlay_id)?;

    let container_rect = container.get_bounding_client_rect();
    let anchor_rect = anchor.get_bounding_client_rect();
    let scroll_x = container.scroll_left() as f64;
    let scroll_y = container.scroll_top() as f64;

    // The bounding rect starts at the border box; shift by the border widths
    // so the anchor shares the content-box origin the client sizes use.
    let origin_x = container_rect.x() + container.client_left() as f64;
    let origin_y = container_rect.y() + container.client_top() as f64;

    let anchor = Rect::new(
        anchor_rect.x() - origin_x + scroll_x,
        anchor_rect.y() - origin_y + scroll_y,
        anchor_rect.width(),
        anchor_rect.height(),
    );

    let overlay_el = overlay.dyn_into::<web_sys::HtmlElement>().ok()?;
    let overlay_size = Size::new(
        overlay_el.offset_width() as f64,
        overlay_el.offset_height() as f64,
    );

    let viewport = Rect::new(
        scroll_x,
        scroll_y,
        container.client_width() as f64,
        container.client_height() as f64,
    );

    let position =
        OverlayPosition::compute(anchor, overlay_size, viewport, OVERLAY_GAP, OVERLAY_MARGIN);
    tracing::trace!(
        target: "slotform::dropdown",
        anchor_id,
        left = position.left,
        top = position.top,
        "positioned overlay"
    );
    Some(position)
}

/// Optimistically paint a committed selection into the anchor's field span.
///
/// The store is the source of truth; this keeps the screen in step without
/// waiting for any re-render. Runs under suppression so the mutation
/// observer does not re-enter, and releases it on the next event-loop turn.
pub fn paint_selection(anchor_id: &str, option: &str, suppress: &std::rc::Rc<Cell<bool>>) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let Some(anchor) = document.get_element_by_id(anchor_id) else {
        // Concurrent structural mutation took the anchor; the store already
        // has the value, so there is nothing left to paint.
        tracing::debug!(target: "slotform::dropdown", anchor_id, "anchor missing on selection paint");
        return;
    };

    suppress.set(true);
    anchor.set_text_content(Some(option));
    let suppress = std::rc::Rc::clone(suppress);
    schedule::defer(move || suppress.set(false));
}
