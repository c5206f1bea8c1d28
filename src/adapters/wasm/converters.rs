use crate::domain::ThrowableInfo;
use js_sys::Reflect;
use wasm_bindgen::{JsCast, JsValue};

/// Turns a JS `Error` into a throwable; any other value yields `None`.
pub fn throwable_from_js(value: &JsValue) -> Option<ThrowableInfo> {
    let error = value.dyn_ref::<js_sys::Error>()?;
    let message: String = error.message().into();
    let name: String = error.name().into();
    let stack = Reflect::get(value, &JsValue::from_str("stack"))
        .ok()
        .and_then(|stack| stack.as_string())
        .unwrap_or_default();

    // V8 repeats `Name: message` on the first stack line.
    let frames: Vec<&str> = stack
        .lines()
        .skip_while(|line| line.starts_with(&format!("{name}:")) || *line == name)
        .collect();
    Some(ThrowableInfo::new(message, frames.join("\n")))
}

pub fn describe_js_value(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_throwable_from_js_error() {
        let error = js_sys::Error::new("boom");
        let throwable = throwable_from_js(&error.into()).unwrap();
        assert_eq!(throwable.message, "boom");
        assert!(!throwable.backtrace.starts_with("Error: boom"));
    }

    #[wasm_bindgen_test]
    fn test_non_error_is_not_throwable() {
        assert!(throwable_from_js(&JsValue::from_str("nope")).is_none());
        assert_eq!(describe_js_value(&JsValue::from_str("nope")), "nope");
    }
}
