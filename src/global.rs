use wasm_bindgen::JsCast;
use web_sys::{DedicatedWorkerGlobalScope, EventTarget, Window};

/// The window, but only when it carries a document (a real page, not a
/// window-like shim).
pub fn window_with_document() -> Option<Window> {
    web_sys::window().filter(|window| window.document().is_some())
}

pub fn dedicated_worker() -> Option<DedicatedWorkerGlobalScope> {
    js_sys::global().dyn_into::<DedicatedWorkerGlobalScope>().ok()
}

/// The global scope as an event target (window, worker, or JS runtime global).
pub fn global_event_target() -> EventTarget {
    js_sys::global().unchecked_into::<EventTarget>()
}
