//! Dioxus component for the slotform template input widget.
//!
//! [`TemplateInput`] renders the outer shell (container, editable host, the
//! dropdown overlay) and owns a [`slotform_browser::TemplateEngine`] mounted
//! on the host element. The engine manages the editable content imperatively
//! so user edits never race a virtual-DOM re-render; Dioxus only re-renders
//! the overlay.
//!
//! ```ignore
//! let config = ConfigHandle::new(
//!     TemplateConfig::new("Dear {name}, see you on {day}.")
//!         .with_field("name", FieldDef::FreeText {
//!             placeholder: "recipient".into(),
//!             default_value: String::new(),
//!         })
//!         .with_field("day", FieldDef::Select {
//!             options: vec!["Monday".into(), "Friday".into()],
//!             default_value: "Monday".into(),
//!         }),
//! );
//! rsx! {
//!     TemplateInput { config, on_change: move |snap| tracing::info!(?snap) }
//! }
//! ```

pub use slotform_browser;
pub use slotform_browser::{
    ActiveDropdown, ChangeSnapshot, FieldDef, SmolStr, TemplateConfig, TemplateEngine,
};

mod component;

pub use component::{ConfigHandle, TemplateInput, TemplateInputHandle, use_template_input_handle};
