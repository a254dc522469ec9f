//! The `TemplateInput` component and its host-facing handle.

use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dioxus::prelude::*;

use slotform_browser::{
    ActiveDropdown, ChangeEmitter, ChangeSnapshot, DismissGuard, EngineHooks, OverlayPosition,
    SelectClick, SmolStr, TemplateConfig, TemplateEngine, measure_overlay, schedule,
};

/// Shared widget configuration with reference identity semantics.
///
/// Prop equality is `Rc` pointer equality, not structural: mutating a config
/// in place is invisible to the widget, while handing it a newly allocated
/// handle always triggers a full reset (re-parse, re-seed, rebuild), even if
/// the contents are identical.
#[derive(Clone)]
pub struct ConfigHandle(pub Rc<TemplateConfig>);

impl ConfigHandle {
    pub fn new(config: TemplateConfig) -> Self {
        Self(Rc::new(config))
    }
}

impl PartialEq for ConfigHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for ConfigHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ConfigHandle").field(&self.0).finish()
    }
}

/// Imperative handle to a mounted [`TemplateInput`].
///
/// Create one with [`use_template_input_handle`] and pass it as the `handle`
/// prop to query widget state from outside the component.
#[derive(Clone, Copy, PartialEq)]
pub struct TemplateInputHandle {
    engine: Signal<Option<Rc<TemplateEngine>>>,
    active: Signal<Option<ActiveDropdown>>,
}

pub fn use_template_input_handle() -> TemplateInputHandle {
    let engine = use_signal(|| None);
    let active = use_signal(|| None);
    TemplateInputHandle { engine, active }
}

impl TemplateInputHandle {
    fn with_engine<R>(&self, f: impl FnOnce(&TemplateEngine) -> R) -> Option<R> {
        self.engine.read().as_ref().map(|engine| f(engine))
    }

    pub fn is_mounted(&self) -> bool {
        self.engine.read().is_some()
    }

    /// Current notification payload: literal display text plus all values.
    pub fn snapshot(&self) -> ChangeSnapshot {
        self.with_engine(TemplateEngine::snapshot).unwrap_or_default()
    }

    /// Template-resolved text from stored values.
    pub fn resolved_text(&self) -> String {
        self.with_engine(TemplateEngine::resolved_text)
            .unwrap_or_default()
    }

    /// Literal on-screen text of the editable region.
    pub fn display_text(&self) -> String {
        self.with_engine(TemplateEngine::display_text)
            .unwrap_or_default()
    }

    pub fn values(&self) -> HashMap<SmolStr, String> {
        self.with_engine(TemplateEngine::values).unwrap_or_default()
    }

    /// Current selection of one enumerated field, `None` for free-text or
    /// unknown keys.
    pub fn selection(&self, key: &str) -> Option<String> {
        self.with_engine(|engine| engine.selection(key)).flatten()
    }

    pub fn selections(&self) -> HashMap<SmolStr, String> {
        self.with_engine(TemplateEngine::selections)
            .unwrap_or_default()
    }

    /// Key of the field whose dropdown is open, empty when none is.
    pub fn active_field(&self) -> SmolStr {
        self.active
            .read()
            .as_ref()
            .map(|dd| dd.key.clone())
            .unwrap_or_default()
    }

    /// Commit `option` for the open dropdown's field, then close it.
    /// No-op when no dropdown is open.
    pub fn commit_selection(&mut self, option: &str) {
        let Some(dd) = self.active.peek().as_ref().cloned() else {
            return;
        };
        if let Some(engine) = self.engine.peek().as_ref().cloned() {
            engine.commit_selection(&dd.key, option, Some(&dd.anchor_id));
        }
        self.active.set(None);
    }

    /// Close the open dropdown, if any, without committing.
    pub fn dismiss(&mut self) {
        if self.active.peek().is_some() {
            self.active.set(None);
        }
    }
}

/// Rich-text template input.
///
/// Renders a contenteditable region from `config.template`, with `{key}`
/// placeholders replaced by inline editable fields (free text) or dropdown
/// selectors (enumerated). Fires `on_change` with a [`ChangeSnapshot`] after
/// every committed edit, plus once right after (re)mount.
#[component]
pub fn TemplateInput(
    config: ConfigHandle,
    #[props(default)] on_change: Option<EventHandler<ChangeSnapshot>>,
    /// External handle; omit it and the widget keeps its state private.
    #[props(default)] handle: Option<TemplateInputHandle>,
    #[props(default)] class: String,
) -> Element {
    // Fallback state so the external handle stays optional. Both pairs of
    // hooks always run; only one pair is used.
    let local_engine: Signal<Option<Rc<TemplateEngine>>> = use_signal(|| None);
    let local_active: Signal<Option<ActiveDropdown>> = use_signal(|| None);
    let handle = handle.unwrap_or(TemplateInputHandle {
        engine: local_engine,
        active: local_active,
    });
    let mut engine_sig = handle.engine;
    let mut active = handle.active;

    let host_id = use_hook(|| {
        static NEXT_WIDGET_ID: AtomicUsize = AtomicUsize::new(0);
        format!("slotform-{}", NEXT_WIDGET_ID.fetch_add(1, Ordering::Relaxed))
    });
    let container_id = format!("{host_id}-container");
    let overlay_id = format!("{host_id}-overlay");

    // (Re)mount the engine whenever the configuration handle is replaced.
    // Runs after the host div is in the document.
    let mount_host_id = host_id.clone();
    use_effect(use_reactive((&config,), move |(config,)| {
        // Drop the previous engine first so its observer and listeners are
        // gone before the rebuild mutates the host.
        engine_sig.set(None);
        active.set(None);

        let emitter = match on_change {
            Some(handler) => ChangeEmitter::new(move |snapshot| handler.call(snapshot)),
            None => ChangeEmitter::disabled(),
        };
        let hooks = EngineHooks {
            on_change: emitter,
            on_select_click: Some(Rc::new(move |click: SelectClick| {
                let mut active = active;
                active.set(Some(ActiveDropdown::open(
                    click.key,
                    click.anchor_id,
                    click.options,
                )));
            })),
        };

        match TemplateEngine::mount(&mount_host_id, Rc::clone(&config.0), hooks) {
            Ok(engine) => engine_sig.set(Some(Rc::new(engine))),
            Err(err) => {
                tracing::error!(target: "slotform::widget", host_id = %mount_host_id, %err, "engine mount failed")
            }
        }
    }));

    // One document-level dismiss listener for the widget's lifetime.
    let mut dismiss_guard: Signal<Option<DismissGuard>> = use_signal(|| None);
    let guard_overlay_id = overlay_id.clone();
    use_effect(move || {
        if dismiss_guard.peek().is_some() {
            return;
        }
        let guard = DismissGuard::install(guard_overlay_id.clone(), move || {
            let mut active = active;
            if active.peek().is_some() {
                active.set(None);
            }
        });
        dismiss_guard.set(guard);
    });

    // Position a freshly opened overlay after it has painted (it needs real
    // dimensions to clamp against the container). Publishing `visible` makes
    // this effect re-run once more and bail out.
    let measure_container_id = container_id.clone();
    let measure_overlay_id = overlay_id.clone();
    use_effect(move || {
        let Some(dd) = active.read().as_ref().cloned() else {
            return;
        };
        if dd.visible {
            return;
        }
        let container_id = measure_container_id.clone();
        let overlay_id = measure_overlay_id.clone();
        schedule::after_paint(move || {
            let Some(position) = measure_overlay(&container_id, &dd.anchor_id, &overlay_id)
            else {
                return;
            };
            let mut active = active;
            let still_open = active
                .peek()
                .as_ref()
                .is_some_and(|cur| cur.anchor_id == dd.anchor_id && !cur.visible);
            if !still_open {
                return;
            }
            let mut positioned = dd.clone();
            positioned.visible = true;
            positioned.position = Some(position);
            active.set(Some(positioned));
        });
    });

    let dropdown = active.read().as_ref().cloned();
    let selected = dropdown
        .as_ref()
        .and_then(|dd| engine_sig.read().as_ref().and_then(|e| e.selection(&dd.key)));

    rsx! {
        div {
            id: "{container_id}",
            class: "slotform-container {class}",
            // Overlay coordinates are container-relative.
            style: "position:relative",

            div {
                id: "{host_id}",
                class: "slotform-host",
                contenteditable: "true",
                spellcheck: "false",
            }

            if let Some(dd) = dropdown {
                div {
                    id: "{overlay_id}",
                    class: "slotform-overlay",
                    style: overlay_style(dd.position.as_ref(), dd.visible),

                    for option in dd.options.clone() {
                        div {
                            key: "{option}",
                            class: if selected.as_deref() == Some(option.as_str()) {
                                "slotform-option slotform-option-selected"
                            } else {
                                "slotform-option"
                            },
                            onclick: {
                                let key = dd.key.clone();
                                let anchor_id = dd.anchor_id.clone();
                                let option = option.clone();
                                move |_| {
                                    if let Some(engine) = engine_sig.peek().as_ref().cloned() {
                                        engine.commit_selection(&key, &option, Some(&anchor_id));
                                    }
                                    active.set(None);
                                }
                            },
                            "{option}"
                        }
                    }
                }
            }
        }
    }
}

/// Inline style for the overlay: painted but invisible until measured, then
/// absolutely positioned at the clamped coordinates.
fn overlay_style(position: Option<&OverlayPosition>, visible: bool) -> String {
    match (position, visible) {
        (Some(pos), true) => {
            format!("position:absolute;left:{}px;top:{}px", pos.left, pos.top)
        }
        _ => "position:absolute;left:0;top:0;visibility:hidden".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_handle_equality_is_by_reference() {
        let a = ConfigHandle::new(TemplateConfig::new("hello {x}"));
        let b = a.clone();
        let c = ConfigHandle::new(TemplateConfig::new("hello {x}"));

        assert_eq!(a, b);
        // Structurally identical but separately allocated: treated as a new
        // configuration.
        assert_eq!(*a.0, *c.0);
        assert_ne!(a, c);
    }

    #[test]
    fn overlay_style_hides_until_measured() {
        assert!(overlay_style(None, false).contains("visibility:hidden"));

        let pos = OverlayPosition {
            left: 12.5,
            top: 40.0,
        };
        assert!(overlay_style(Some(&pos), false).contains("visibility:hidden"));
        let style = overlay_style(Some(&pos), true);
        assert!(style.contains("left:12.5px"));
        assert!(style.contains("top:40px"));
    }
}
