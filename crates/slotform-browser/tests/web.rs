//! WASM browser tests for slotform-browser.
//!
//! Run with: `wasm-pack test --headless --firefox` or `--chrome`

#![cfg(target_arch = "wasm32")]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

use slotform_browser::{
    ANCHOR_CHAR, ChangeEmitter, DismissGuard, EngineHooks, FieldDef, FieldValues, OVERLAY_GAP,
    TemplateConfig, TemplateEngine, build_segments, display_text, field_text, handle_delete_key,
    measure_overlay, normalize_field, parse_template,
};

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

/// Append a fresh host div with the given id to the document body.
fn mount_host(id: &str) -> web_sys::Element {
    let doc = document();
    let host = doc.create_element("div").unwrap();
    host.set_id(id);
    doc.body().unwrap().append_child(host.as_ref()).unwrap();
    host
}

fn sample_config() -> TemplateConfig {
    TemplateConfig::new("Hello {name}, pick {color}!")
        .with_field(
            "name",
            FieldDef::FreeText {
                placeholder: "Your name".into(),
                default_value: "Alice".into(),
            },
        )
        .with_field(
            "color",
            FieldDef::Select {
                options: vec!["Red".into(), "Green".into(), "Blue".into()],
                default_value: "Red".into(),
            },
        )
}

fn build_into(host: &web_sys::Element, config: &TemplateConfig, host_id: &str) {
    let values = FieldValues::seeded(&config.fields);
    let segments = parse_template(&config.template, &config.fields, &values);
    build_segments(&document(), host, &segments, host_id).unwrap();
}

// === Render tests ===

#[wasm_bindgen_test]
fn test_build_segments_structure() {
    let host = mount_host("t-build");
    build_into(&host, &sample_config(), "t-build");

    let input = host
        .query_selector("[data-field-kind='input']")
        .unwrap()
        .expect("free-text span missing");
    assert_eq!(input.get_attribute("data-field-key").as_deref(), Some("name"));
    assert_eq!(input.id(), "t-build-f1");

    let select = host
        .query_selector("[data-field-kind='select']")
        .unwrap()
        .expect("select span missing");
    assert_eq!(select.get_attribute("data-field-key").as_deref(), Some("color"));
    assert_eq!(select.get_attribute("contenteditable").as_deref(), Some("false"));
    assert_eq!(select.text_content().as_deref(), Some("Red"));

    host.remove();
}

#[wasm_bindgen_test]
fn test_empty_field_gets_anchor_text() {
    let config = TemplateConfig::new("{note}").with_field(
        "note",
        FieldDef::FreeText {
            placeholder: "Add a note".into(),
            default_value: String::new(),
        },
    );
    let host = mount_host("t-anchor");
    build_into(&host, &config, "t-anchor");

    let field = host
        .query_selector("[data-field-kind='input']")
        .unwrap()
        .unwrap();
    assert_eq!(field_text(&field), ANCHOR_CHAR.to_string());
    // Placeholder companion visible while the field is empty.
    let ph = field.query_selector("[data-ph]").unwrap().unwrap();
    assert!(!ph.class_list().contains("hidden"));

    host.remove();
}

// === Display text tests ===

#[wasm_bindgen_test]
fn test_display_text_skips_placeholder_and_markers() {
    let config = TemplateConfig::new("a {x} b").with_field(
        "x",
        FieldDef::FreeText {
            placeholder: "fill me".into(),
            default_value: String::new(),
        },
    );
    let host = mount_host("t-display");
    build_into(&host, &config, "t-display");

    // Placeholder text and the zero-width anchor are both invisible.
    assert_eq!(display_text(&host), "a  b");

    host.remove();
}

// === Normalization tests ===

#[wasm_bindgen_test]
fn test_normalize_restores_anchor() {
    let host = mount_host("t-norm");
    build_into(&host, &sample_config(), "t-norm");

    let field = host
        .query_selector("[data-field-kind='input']")
        .unwrap()
        .unwrap();
    // Simulate the browser wiping the field's text entirely.
    let text = field.last_child().unwrap();
    text.set_text_content(Some(""));

    let suppress = Cell::new(false);
    let outcome = normalize_field(&document(), &field, &suppress).unwrap();
    assert_eq!(outcome.key, "name");
    assert_eq!(outcome.value, "");
    assert!(outcome.mutated);
    assert!(suppress.get());
    assert_eq!(field_text(&field), ANCHOR_CHAR.to_string());

    host.remove();
}

#[wasm_bindgen_test]
fn test_normalize_is_idempotent() {
    let host = mount_host("t-norm2");
    build_into(&host, &sample_config(), "t-norm2");

    let field = host
        .query_selector("[data-field-kind='input']")
        .unwrap()
        .unwrap();

    let suppress = Cell::new(false);
    let outcome = normalize_field(&document(), &field, &suppress).unwrap();
    assert_eq!(outcome.value, "Alice");
    assert!(!outcome.mutated);
    assert!(!suppress.get());

    host.remove();
}

// === Deletion tests ===

fn backspace_event() -> web_sys::KeyboardEvent {
    let init = web_sys::KeyboardEventInit::new();
    init.set_key("Backspace");
    init.set_cancelable(true);
    web_sys::KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).unwrap()
}

fn place_caret_in_field(field: &web_sys::Element) {
    let text = field.last_child().unwrap();
    slotform_browser::place_caret_at_node_edge(&text, true).unwrap();
}

fn selection() -> web_sys::Selection {
    web_sys::window().unwrap().get_selection().unwrap().unwrap()
}

fn empty_field() -> FieldDef {
    FieldDef::FreeText {
        placeholder: "fill me".into(),
        default_value: String::new(),
    }
}

#[wasm_bindgen_test]
fn test_delete_key_removes_empty_field() {
    let config = TemplateConfig::new("a{x}b").with_field("x", empty_field());
    let host = mount_host("t-del");
    build_into(&host, &config, "t-del");

    let field = host
        .query_selector("[data-field-kind='input']")
        .unwrap()
        .unwrap();
    let field_node: &web_sys::Node = field.as_ref();
    let prev_text = field_node.previous_sibling().unwrap();
    place_caret_in_field(&field);

    let suppress = Cell::new(false);
    assert!(handle_delete_key(&backspace_event(), &host, &suppress));
    assert!(suppress.get());
    assert!(
        host.query_selector("[data-field-kind='input']")
            .unwrap()
            .is_none()
    );
    assert_eq!(display_text(&host), "ab");

    // Caret hand-off: end of the preceding text node "a".
    let sel = selection();
    let anchor = sel.anchor_node().unwrap();
    assert!(anchor.is_same_node(Some(&prev_text)));
    assert_eq!(sel.anchor_offset(), 1);
    assert!(sel.is_collapsed());

    host.remove();
}

#[wasm_bindgen_test]
fn test_delete_key_caret_falls_to_next_sibling() {
    // No text precedes the field, so the caret lands at the start of the
    // following text node instead.
    let config = TemplateConfig::new("{x}b").with_field("x", empty_field());
    let host = mount_host("t-del3");
    build_into(&host, &config, "t-del3");

    let field = host
        .query_selector("[data-field-kind='input']")
        .unwrap()
        .unwrap();
    let field_node: &web_sys::Node = field.as_ref();
    assert!(field_node.previous_sibling().is_none());
    let next_text = field_node.next_sibling().unwrap();
    place_caret_in_field(&field);

    let suppress = Cell::new(false);
    assert!(handle_delete_key(&backspace_event(), &host, &suppress));

    let sel = selection();
    let anchor = sel.anchor_node().unwrap();
    assert!(anchor.is_same_node(Some(&next_text)));
    assert_eq!(sel.anchor_offset(), 0);

    host.remove();
}

#[wasm_bindgen_test]
fn test_delete_key_caret_falls_to_container() {
    // The field is the host's only child; with no siblings left the caret
    // collapses to the end of the editable container itself.
    let config = TemplateConfig::new("{x}").with_field("x", empty_field());
    let host = mount_host("t-del4");
    build_into(&host, &config, "t-del4");

    let field = host
        .query_selector("[data-field-kind='input']")
        .unwrap()
        .unwrap();
    place_caret_in_field(&field);

    let suppress = Cell::new(false);
    assert!(handle_delete_key(&backspace_event(), &host, &suppress));

    let sel = selection();
    let anchor = sel.anchor_node().unwrap();
    let host_node: &web_sys::Node = host.as_ref();
    assert!(anchor.is_same_node(Some(host_node)));

    host.remove();
}

#[wasm_bindgen_test]
fn test_delete_key_ignored_with_content() {
    let host = mount_host("t-del2");
    build_into(&host, &sample_config(), "t-del2");

    let field = host
        .query_selector("[data-field-kind='input']")
        .unwrap()
        .unwrap();
    place_caret_in_field(&field);

    let suppress = Cell::new(false);
    // "Alice" is real content; native editing must proceed.
    assert!(!handle_delete_key(&backspace_event(), &host, &suppress));
    assert!(!suppress.get());
    assert!(
        host.query_selector("[data-field-kind='input']")
            .unwrap()
            .is_some()
    );

    host.remove();
}

// === Engine tests ===

#[wasm_bindgen_test]
fn test_engine_initial_snapshot() {
    let host = mount_host("t-engine");
    let captured: Rc<RefCell<Vec<slotform_browser::ChangeSnapshot>>> = Rc::default();
    let sink = Rc::clone(&captured);

    let engine = TemplateEngine::mount(
        "t-engine",
        Rc::new(sample_config()),
        EngineHooks {
            on_change: ChangeEmitter::new(move |snap| sink.borrow_mut().push(snap)),
            on_select_click: None,
        },
    )
    .unwrap();

    assert_eq!(captured.borrow().len(), 1);
    let snap = captured.borrow()[0].clone();
    assert_eq!(snap.text, "Hello Alice, pick Red!");
    assert_eq!(snap.values.get("name").map(String::as_str), Some("Alice"));
    assert_eq!(snap.values.get("color").map(String::as_str), Some("Red"));
    assert_eq!(engine.resolved_text(), "Hello Alice, pick Red!");

    drop(engine);
    host.remove();
}

#[wasm_bindgen_test]
fn test_engine_commit_selection() {
    let host = mount_host("t-commit");
    let captured: Rc<RefCell<Vec<slotform_browser::ChangeSnapshot>>> = Rc::default();
    let sink = Rc::clone(&captured);
    let engine = TemplateEngine::mount(
        "t-commit",
        Rc::new(sample_config()),
        EngineHooks {
            on_change: ChangeEmitter::new(move |snap| sink.borrow_mut().push(snap)),
            on_select_click: None,
        },
    )
    .unwrap();

    let anchor = host
        .query_selector("[data-field-kind='select']")
        .unwrap()
        .unwrap();
    engine.commit_selection("color", "Blue", Some(&anchor.id()));

    assert_eq!(engine.selection("color").as_deref(), Some("Blue"));
    assert_eq!(anchor.text_content().as_deref(), Some("Blue"));
    assert_eq!(engine.display_text(), "Hello Alice, pick Blue!");
    // Free-text keys have no selection.
    assert_eq!(engine.selection("name"), None);

    // The commit itself produced a notification carrying the new value.
    assert_eq!(captured.borrow().len(), 2);
    let snap = captured.borrow().last().unwrap().clone();
    assert_eq!(snap.values.get("color").map(String::as_str), Some("Blue"));
    assert_eq!(snap.text, "Hello Alice, pick Blue!");

    drop(engine);
    host.remove();
}

#[wasm_bindgen_test]
fn test_engine_select_click_hook() {
    let host = mount_host("t-click");
    let clicked: Rc<RefCell<Option<slotform_browser::SelectClick>>> = Rc::default();
    let sink = Rc::clone(&clicked);

    let engine = TemplateEngine::mount(
        "t-click",
        Rc::new(sample_config()),
        EngineHooks {
            on_change: ChangeEmitter::disabled(),
            on_select_click: Some(Rc::new(move |click| {
                *sink.borrow_mut() = Some(click);
            })),
        },
    )
    .unwrap();

    let span = host
        .query_selector("[data-field-kind='select']")
        .unwrap()
        .unwrap();
    let init = web_sys::EventInit::new();
    init.set_bubbles(true);
    let event = web_sys::Event::new_with_event_init_dict("click", &init).unwrap();
    span.dispatch_event(&event).unwrap();

    let click = clicked.borrow().clone().expect("hook not invoked");
    assert_eq!(click.key, "color");
    assert_eq!(click.anchor_id, span.id());
    assert_eq!(click.options, ["Red", "Green", "Blue"]);

    drop(engine);
    host.remove();
}

#[wasm_bindgen_test]
fn test_second_select_click_dismisses_open_overlay() {
    // Two enumerated fields; clicking the second while the first's overlay is
    // open must close that overlay (exactly one dismissal) before the new
    // open is reported.
    let select = |options: &[&str]| FieldDef::Select {
        options: options.iter().map(|s| s.to_string()).collect(),
        default_value: options[0].to_string(),
    };
    let config = TemplateConfig::new("{a} vs {b}")
        .with_field("a", select(&["X", "Y"]))
        .with_field("b", select(&["P", "Q"]));
    let host = mount_host("t-super");
    let doc = document();

    let opened: Rc<RefCell<Vec<slotform_browser::SmolStr>>> = Rc::default();
    let opened_sink = Rc::clone(&opened);
    let engine = TemplateEngine::mount(
        "t-super",
        Rc::new(config),
        EngineHooks {
            on_change: ChangeEmitter::disabled(),
            on_select_click: Some(Rc::new(move |click| {
                opened_sink.borrow_mut().push(click.key);
                // Stand-in for the widget painting its overlay.
                let doc = document();
                if doc.get_element_by_id("t-super-overlay").is_none() {
                    let overlay = doc.create_element("div").unwrap();
                    overlay.set_id("t-super-overlay");
                    doc.body().unwrap().append_child(overlay.as_ref()).unwrap();
                }
            })),
        },
    )
    .unwrap();

    let dismissals = Rc::new(Cell::new(0u32));
    let count = Rc::clone(&dismissals);
    let guard = DismissGuard::install("t-super-overlay", move || {
        count.set(count.get() + 1);
        if let Some(overlay) = document().get_element_by_id("t-super-overlay") {
            overlay.remove();
        }
    })
    .unwrap();

    let interact = |target: &web_sys::Element| {
        for kind in ["pointerdown", "click"] {
            let init = web_sys::EventInit::new();
            init.set_bubbles(true);
            let event = web_sys::Event::new_with_event_init_dict(kind, &init).unwrap();
            target.dispatch_event(&event).unwrap();
        }
    };

    let span_a = host.query_selector("[data-field-key='a']").unwrap().unwrap();
    let span_b = host.query_selector("[data-field-key='b']").unwrap().unwrap();

    // Nothing open yet: the first interaction opens without dismissing.
    interact(&span_a);
    assert_eq!(dismissals.get(), 0);

    // A's overlay is open: B's interaction closes it once, then opens B.
    interact(&span_b);
    assert_eq!(dismissals.get(), 1);
    assert_eq!(opened.borrow().as_slice(), ["a", "b"]);
    assert!(doc.get_element_by_id("t-super-overlay").is_some());

    drop(guard);
    drop(engine);
    if let Some(overlay) = doc.get_element_by_id("t-super-overlay") {
        overlay.remove();
    }
    host.remove();
}

// === Overlay tests ===

#[wasm_bindgen_test]
fn test_measure_overlay_missing_elements() {
    assert!(measure_overlay("no-container", "no-anchor", "no-overlay").is_none());
}

#[wasm_bindgen_test]
fn test_measure_overlay_below_anchor() {
    let doc = document();
    let body = doc.body().unwrap();

    let container = doc.create_element("div").unwrap();
    container.set_id("t-ov-container");
    container
        .set_attribute("style", "position:relative;width:400px;height:300px")
        .unwrap();
    body.append_child(container.as_ref()).unwrap();

    let anchor = doc.create_element("span").unwrap();
    anchor.set_id("t-ov-anchor");
    anchor
        .set_attribute("style", "display:inline-block;width:60px;height:20px")
        .unwrap();
    container.append_child(anchor.as_ref()).unwrap();

    let overlay = doc.create_element("div").unwrap();
    overlay.set_id("t-ov-overlay");
    overlay
        .set_attribute("style", "position:absolute;width:100px;height:50px")
        .unwrap();
    container.append_child(overlay.as_ref()).unwrap();

    let pos = measure_overlay("t-ov-container", "t-ov-anchor", "t-ov-overlay")
        .expect("measurement failed");
    // Anchor sits at the container origin; the overlay opens below it.
    assert!(pos.left >= 0.0);
    assert!(pos.top >= 20.0);

    container.remove();
}

#[wasm_bindgen_test]
fn test_measure_overlay_ignores_container_border() {
    // A border shifts the bounding rect but not the client box; anchor
    // coordinates must come out in content-box space regardless.
    let doc = document();
    let body = doc.body().unwrap();

    let container = doc.create_element("div").unwrap();
    container.set_id("t-bd-container");
    container
        .set_attribute(
            "style",
            "position:relative;width:400px;height:300px;border:10px solid black",
        )
        .unwrap();
    body.append_child(container.as_ref()).unwrap();

    let anchor = doc.create_element("span").unwrap();
    anchor.set_id("t-bd-anchor");
    anchor
        .set_attribute("style", "position:absolute;left:50px;top:0;width:60px;height:20px")
        .unwrap();
    container.append_child(anchor.as_ref()).unwrap();

    let overlay = doc.create_element("div").unwrap();
    overlay.set_id("t-bd-overlay");
    overlay
        .set_attribute("style", "position:absolute;width:100px;height:50px")
        .unwrap();
    container.append_child(overlay.as_ref()).unwrap();

    let pos = measure_overlay("t-bd-container", "t-bd-anchor", "t-bd-overlay")
        .expect("measurement failed");
    assert_eq!(pos.left, 50.0);
    assert_eq!(pos.top, 20.0 + OVERLAY_GAP);

    container.remove();
}

// === Dismissal tests ===

#[wasm_bindgen_test]
fn test_dismiss_outside_pointerdown() {
    let doc = document();
    let body = doc.body().unwrap();

    let overlay = doc.create_element("div").unwrap();
    overlay.set_id("t-dismiss-overlay");
    body.append_child(overlay.as_ref()).unwrap();
    let inside = doc.create_element("button").unwrap();
    overlay.append_child(inside.as_ref()).unwrap();

    let outside = doc.create_element("div").unwrap();
    body.append_child(outside.as_ref()).unwrap();

    let dismissed = Rc::new(Cell::new(0u32));
    let count = Rc::clone(&dismissed);
    let guard = DismissGuard::install("t-dismiss-overlay", move || {
        count.set(count.get() + 1);
    })
    .unwrap();

    let pointerdown = || {
        let init = web_sys::EventInit::new();
        init.set_bubbles(true);
        web_sys::Event::new_with_event_init_dict("pointerdown", &init).unwrap()
    };

    // Inside the overlay: no dismissal.
    inside.dispatch_event(&pointerdown()).unwrap();
    assert_eq!(dismissed.get(), 0);

    // Outside: dismissal fires.
    outside.dispatch_event(&pointerdown()).unwrap();
    assert_eq!(dismissed.get(), 1);

    drop(guard);
    overlay.remove();
    outside.remove();
}
