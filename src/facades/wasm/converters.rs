use crate::domain::{ErrorInput, Metadata};
use crate::adapters::wasm::converters::throwable_from_js;
use serde_json::Value;
use serde_wasm_bindgen::from_value;
use wasm_bindgen::prelude::*;

pub fn to_js_error<E: std::fmt::Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// `undefined` and `null` become `Value::Null`.
pub fn js_value_to_json(value: JsValue) -> Result<Value, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(Value::Null);
    }
    from_value(value).map_err(to_js_error)
}

/// Metadata argument of the leveled methods; absent or empty yields `None`.
pub fn js_value_to_meta(value: JsValue) -> Result<Option<Metadata>, JsValue> {
    let meta = Metadata::from(js_value_to_json(value)?);
    Ok((!meta.is_empty()).then_some(meta))
}

/// Second argument of `error`/`critical`: a JS `Error`, a metadata object,
/// or nothing.
pub fn js_value_to_error_input(value: JsValue) -> Result<ErrorInput, JsValue> {
    if let Some(throwable) = throwable_from_js(&value) {
        return Ok(ErrorInput::Throwable(throwable));
    }
    Ok(match js_value_to_meta(value)? {
        Some(meta) => ErrorInput::Meta(meta),
        None => ErrorInput::None,
    })
}
