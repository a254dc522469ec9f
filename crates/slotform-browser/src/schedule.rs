//! One-shot deferrals onto the host event loop.
//!
//! The engine has exactly two reasons to defer work: letting the displayed
//! document settle before measuring overlay geometry, and clearing the
//! loop-suppression flag after a programmatic edit. Both are fire-and-forget
//! single-shot deferrals, never long-running tasks.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

/// Run `f` on the next turn of the event loop.
pub fn defer(f: impl FnOnce() + 'static) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::once(f);
    let _ = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(closure.as_ref().unchecked_ref(), 0);
    closure.forget();
}

/// Run `f` after the next rendering pass.
pub fn after_paint(f: impl FnOnce() + 'static) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::once(f);
    let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    closure.forget();
}
