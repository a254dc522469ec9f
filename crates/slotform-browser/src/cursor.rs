//! Caret placement via the DOM Selection API.
//!
//! After a whole-field removal the caret has to land somewhere sensible.
//! Placement can fail against detached or unexpected nodes, so every entry
//! point here returns `Result` and the relocation chain degrades silently:
//! a lost caret position is better than a user-visible error.

use slotform_core::DomError;

/// Collapse the selection to one edge of `node`'s contents.
///
/// Works for both text nodes (caret lands inside the text) and elements
/// (caret lands just inside the boundary).
pub fn place_caret_at_node_edge(node: &web_sys::Node, at_end: bool) -> Result<(), DomError> {
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;

    let selection = window
        .get_selection()
        .map_err(|e| format!("get_selection failed: {:?}", e))?
        .ok_or("no selection object")?;
    let range = document
        .create_range()
        .map_err(|e| format!("create_range failed: {:?}", e))?;

    range
        .select_node_contents(node)
        .map_err(|e| format!("select_node_contents failed: {:?}", e))?;
    range.collapse_with_to_start(!at_end);

    selection
        .remove_all_ranges()
        .map_err(|e| format!("remove_all_ranges failed: {:?}", e))?;
    selection
        .add_range(&range)
        .map_err(|e| format!("add_range failed: {:?}", e))?;

    Ok(())
}

/// Relocate the caret after a field region was removed.
///
/// Preference order: end of the preceding sibling's text, start of the
/// following sibling, end of the whole editable container. The last resort
/// failing is abandoned silently; nothing here reaches the host.
pub fn relocate_caret(
    prev: Option<&web_sys::Node>,
    next: Option<&web_sys::Node>,
    container: &web_sys::Node,
) {
    if let Some(node) = prev {
        match place_caret_at_node_edge(node, true) {
            Ok(()) => return,
            Err(e) => {
                tracing::trace!(target: "slotform::cursor", error = %e, "previous-sibling caret placement failed")
            }
        }
    }
    if let Some(node) = next {
        match place_caret_at_node_edge(node, false) {
            Ok(()) => return,
            Err(e) => {
                tracing::trace!(target: "slotform::cursor", error = %e, "next-sibling caret placement failed")
            }
        }
    }
    if let Err(e) = place_caret_at_node_edge(container, true) {
        tracing::debug!(target: "slotform::cursor", error = %e, "abandoning caret relocation");
    }
}
