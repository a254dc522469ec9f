//! The mounted engine: every controller wired to one editable host.
//!
//! [`TemplateEngine::mount`] builds the segment tree, seeds the value store,
//! and attaches the mutation observer plus the host-level event listeners.
//! Dropping the engine disconnects all of them; the painted tree is left for
//! the caller to discard.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;

use slotform_core::{
    ChangeSnapshot, DomError, FieldValues, SmolStr, TemplateConfig, parse_template, resolved_text,
};

use crate::dropdown::paint_selection;
use crate::field::{SubtreeObserver, handle_delete_key, normalize_field};
use crate::notify::{ChangeEmitter, display_text, live_snapshot};
use crate::render::build_segments;
use crate::schedule;

/// A click on an enumerated field's painted region.
#[derive(Clone, Debug)]
pub struct SelectClick {
    pub key: SmolStr,
    /// Element id of the clicked field span, for overlay anchoring.
    pub anchor_id: String,
    pub options: Vec<String>,
}

/// Host-provided callbacks.
#[derive(Clone, Default)]
pub struct EngineHooks {
    pub on_change: ChangeEmitter,
    /// Invoked when an enumerated field's region is clicked. The dropdown
    /// overlay itself is rendered by the caller; `None` disables the hook.
    pub on_select_click: Option<Rc<dyn Fn(SelectClick)>>,
}

struct EngineShared {
    host_id: String,
    config: Rc<TemplateConfig>,
    values: RefCell<FieldValues>,
    /// Reentrancy flag for the controller's own DOM edits.
    suppress: Rc<Cell<bool>>,
    emitter: ChangeEmitter,
}

impl EngineShared {
    fn host_element(&self) -> Option<web_sys::Element> {
        web_sys::window()?
            .document()?
            .get_element_by_id(&self.host_id)
    }

    /// Strip/normalize every free-text field instance, write values through
    /// to the store, and emit a snapshot.
    fn normalize_and_emit(self: &Rc<Self>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(host) = self.host_element() else {
            tracing::trace!(target: "slotform::engine", host_id = %self.host_id, "host missing, skipping normalization");
            return;
        };

        let mut mutated = false;
        if let Ok(fields) = host.query_selector_all("[data-field-kind='input']") {
            for i in 0..fields.length() {
                let Some(node) = fields.get(i) else {
                    continue;
                };
                let Ok(field) = node.dyn_into::<web_sys::Element>() else {
                    continue;
                };
                if let Some(outcome) = normalize_field(&document, &field, &self.suppress) {
                    self.values.borrow_mut().set(outcome.key, outcome.value);
                    mutated |= outcome.mutated;
                }
            }
        }

        if mutated {
            self.release_suppression();
        }
        self.emit();
    }

    /// Clear the reentrancy flag on the next event-loop turn, after the
    /// programmatic edit has settled past the observer.
    fn release_suppression(self: &Rc<Self>) {
        let suppress = Rc::clone(&self.suppress);
        schedule::defer(move || suppress.set(false));
    }

    fn emit(&self) {
        let Some(host) = self.host_element() else {
            return;
        };
        self.emitter.emit(live_snapshot(&host, &self.values.borrow()));
    }
}

/// Everything the widget needs, mounted on one editable host element.
pub struct TemplateEngine {
    shared: Rc<EngineShared>,
    _observer: SubtreeObserver,
    _listeners: Vec<EventListener>,
}

impl TemplateEngine {
    /// Build the segment tree under the element with id `host_id`, seed the
    /// store from the configuration's defaults, attach all listeners, and
    /// emit the initial snapshot.
    pub fn mount(
        host_id: &str,
        config: Rc<TemplateConfig>,
        hooks: EngineHooks,
    ) -> Result<Self, DomError> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let host = document
            .get_element_by_id(host_id)
            .ok_or_else(|| format!("editable host not found: {host_id}"))?;

        host.set_attribute("contenteditable", "true")
            .map_err(|e| format!("set contenteditable failed: {:?}", e))?;

        let values = FieldValues::seeded(&config.fields);
        let segments = parse_template(&config.template, &config.fields, &values);
        build_segments(&document, &host, &segments, host_id)?;

        let shared = Rc::new(EngineShared {
            host_id: host_id.to_owned(),
            config,
            values: RefCell::new(values),
            suppress: Rc::new(Cell::new(false)),
            emitter: hooks.on_change,
        });

        let observer_shared = Rc::clone(&shared);
        let observer = SubtreeObserver::attach(host.as_ref(), move || {
            if observer_shared.suppress.get() {
                tracing::trace!(target: "slotform::engine", "suppressed self-inflicted mutation batch");
                return;
            }
            observer_shared.normalize_and_emit();
        })?;

        let mut listeners = Vec::new();
        let host_target: &web_sys::EventTarget = host.as_ref();

        let keydown_shared = Rc::clone(&shared);
        listeners.push(EventListener::new_with_options(
            host_target,
            "keydown",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                let Some(event) = event.dyn_ref::<web_sys::KeyboardEvent>() else {
                    return;
                };
                let Some(host) = keydown_shared.host_element() else {
                    return;
                };
                if handle_delete_key(event, &host, &keydown_shared.suppress) {
                    keydown_shared.normalize_and_emit();
                    keydown_shared.release_suppression();
                }
            },
        ));

        let blur_shared = Rc::clone(&shared);
        listeners.push(EventListener::new(host_target, "focusout", move |_event| {
            blur_shared.normalize_and_emit();
        }));

        if let Some(on_select_click) = hooks.on_select_click {
            let click_shared = Rc::clone(&shared);
            listeners.push(EventListener::new(host_target, "click", move |event| {
                let Some(host) = click_shared.host_element() else {
                    return;
                };
                let Some(click) = select_click_from_event(event, &host, &click_shared.config)
                else {
                    return;
                };
                tracing::debug!(target: "slotform::engine", key = %click.key, "select field clicked");
                on_select_click(click);
            }));
        }

        shared.emit();

        Ok(Self {
            shared,
            _observer: observer,
            _listeners: listeners,
        })
    }

    /// Commit an option for an enumerated field: store write, optimistic
    /// paint of the anchor span, change notification.
    pub fn commit_selection(&self, key: &str, option: &str, anchor_id: Option<&str>) {
        self.shared.values.borrow_mut().set(key, option);
        if let Some(anchor_id) = anchor_id {
            paint_selection(anchor_id, option, &self.shared.suppress);
        }
        self.shared.emit();
    }

    /// Re-run normalization and emit, as on a generic content-changed signal.
    pub fn refresh(&self) {
        self.shared.normalize_and_emit();
    }

    /// Current notification payload, without emitting.
    pub fn snapshot(&self) -> ChangeSnapshot {
        let values = self.shared.values.borrow();
        match self.shared.host_element() {
            Some(host) => live_snapshot(&host, &values),
            None => ChangeSnapshot::new(String::new(), &values),
        }
    }

    /// Template-resolved text from stored values.
    pub fn resolved_text(&self) -> String {
        resolved_text(&self.shared.config, &self.shared.values.borrow())
    }

    /// Literal on-screen text of the editable host.
    pub fn display_text(&self) -> String {
        self.shared
            .host_element()
            .map(|host| display_text(&host))
            .unwrap_or_default()
    }

    /// Copy of all field values.
    pub fn values(&self) -> HashMap<SmolStr, String> {
        self.shared.values.borrow().snapshot()
    }

    /// Current selection of one enumerated field, `None` for free-text or
    /// unknown keys.
    pub fn selection(&self, key: &str) -> Option<String> {
        let def = self.shared.config.fields.get(key)?;
        if !def.is_select() {
            return None;
        }
        self.shared
            .values
            .borrow()
            .get(key)
            .map(str::to_owned)
    }

    /// Current selections of every enumerated field.
    pub fn selections(&self) -> HashMap<SmolStr, String> {
        let values = self.shared.values.borrow();
        self.shared
            .config
            .fields
            .iter()
            .filter(|(_, def)| def.is_select())
            .map(|(key, _)| {
                let value = values.get(key).unwrap_or_default().to_owned();
                (key.clone(), value)
            })
            .collect()
    }

    pub fn config(&self) -> &Rc<TemplateConfig> {
        &self.shared.config
    }

    pub fn host_id(&self) -> &str {
        &self.shared.host_id
    }
}

/// Resolve a click event to the enumerated field span it landed on, if any.
fn select_click_from_event(
    event: &web_sys::Event,
    host: &web_sys::Element,
    config: &TemplateConfig,
) -> Option<SelectClick> {
    let target = event.target()?;
    let node = target.dyn_into::<web_sys::Node>().ok()?;
    let element = match node.dyn_ref::<web_sys::Element>() {
        Some(element) => element.clone(),
        None => node.parent_element()?,
    };
    let field = element.closest("[data-field-kind='select']").ok()??;

    let host_node: &web_sys::Node = host.as_ref();
    let field_node: &web_sys::Node = field.as_ref();
    if !host_node.contains(Some(field_node)) {
        return None;
    }

    let key = field.get_attribute("data-field-key")?;
    let def = config.fields.get(key.as_str())?;
    Some(SelectClick {
        key: SmolStr::new(key),
        anchor_id: field.id(),
        options: def.options().to_vec(),
    })
}
