//! slotform-core: pure engine logic for the template input widget.
//!
//! This crate provides:
//! - `TemplateConfig` / `FieldDef` - host-facing configuration types
//! - `parse_template` - template string → ordered renderable segments
//! - `FieldValues` - field key → current value store
//! - marker stripping and change snapshots
//! - `OverlayPosition` - container-relative dropdown clamping math
//!
//! Everything here is framework-free and testable on native targets; the
//! browser DOM layer lives in `slotform-browser`.

pub mod error;
pub mod overlay;
pub mod segment;
pub mod snapshot;
pub mod store;
pub mod types;

pub use error::DomError;
pub use overlay::{OVERLAY_GAP, OVERLAY_MARGIN, OverlayPosition, Rect, Size};
pub use segment::{Segment, parse_template, resolve_content};
pub use smol_str::SmolStr;
pub use snapshot::{ANCHOR_CHAR, ChangeSnapshot, has_real_content, resolved_text, strip_markers};
pub use store::FieldValues;
pub use types::{FieldDef, TemplateConfig};
