//! Browser DOM layer for the slotform template input widget.
//!
//! This crate binds the pure engine logic from `slotform-core` to a live
//! contenteditable document. It assumes a `wasm32-unknown-unknown` target
//! environment at runtime.
//!
//! # Architecture
//!
//! - `render`: segment list → editable host child tree
//! - `field`: editable-field controller (mutation observation, empty-field
//!   anchor invariant, whole-field deletion)
//! - `cursor`: caret placement and the relocation fallback chain
//! - `dropdown`: overlay measurement against the scrollable container
//! - `dismiss`: document-level outside-interaction dismissal
//! - `notify`: live-document snapshots and change emission
//! - `engine`: everything wired together behind [`TemplateEngine`]
//!
//! # Re-exports
//!
//! This crate re-exports `slotform-core` for convenience, so consumers only
//! need to depend on `slotform-browser`.

// Re-export core crate
pub use slotform_core;
pub use slotform_core::*;

pub mod cursor;
pub mod dismiss;
pub mod dropdown;
pub mod engine;
pub mod field;
pub mod notify;
pub mod render;
pub mod schedule;

pub use cursor::{place_caret_at_node_edge, relocate_caret};
pub use dismiss::DismissGuard;
pub use dropdown::{ActiveDropdown, measure_overlay, paint_selection};
pub use engine::{EngineHooks, SelectClick, TemplateEngine};
pub use field::{SubtreeObserver, field_text, handle_delete_key, normalize_field};
pub use notify::{ChangeEmitter, display_text, live_snapshot};
pub use render::build_segments;
