use crate::domain::Backtrace;
use crate::errors::BacktraceError;
use js_sys::Reflect;
use wasm_bindgen::JsValue;

/// Captures the JS stack through `new Error().stack`; wasm has no native
/// stack walker. The `Error` header line is dropped.
#[inline(never)]
pub fn capture_backtrace() -> Result<Backtrace, BacktraceError> {
    let error = js_sys::Error::new("");
    let stack = Reflect::get(&error, &JsValue::from_str("stack"))
        .ok()
        .and_then(|stack| stack.as_string())
        .ok_or(BacktraceError::Unsupported)?;

    let frames = stack
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && *line != "Error")
        .map(str::to_string)
        .collect();
    Ok(Backtrace::from_frames(frames))
}
