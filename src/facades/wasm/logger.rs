use super::converters;
use crate::adapters::capture_backtrace;
use crate::domain::caller::STACK_UNAVAILABLE;
use crate::domain::{resolve_caller, Level};
use crate::logger::{normalize_label, Logger};
use wasm_bindgen::prelude::*;

/// Call site seen from JS: wasm frames and the generated glue frame removed.
struct JsCallSite {
    caller: String,
    stack: String,
}

fn is_wasm_frame(frame: &str) -> bool {
    frame.contains("wasm://") || frame.contains("wasm-function")
}

fn js_call_site() -> JsCallSite {
    let frames: Vec<String> = capture_backtrace()
        .map(|trace| {
            trace
                .frames()
                .iter()
                .filter(|frame| !is_wasm_frame(frame))
                .skip(1)
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    let stack = if frames.is_empty() {
        STACK_UNAVAILABLE.to_string()
    } else {
        frames.join("\n")
    };
    JsCallSite {
        caller: resolve_caller(&frames, 0),
        stack,
    }
}

/// Logger handle exported to JS.
#[wasm_bindgen]
pub struct JsLogger {
    logger: Logger,
}

impl From<Logger> for JsLogger {
    fn from(logger: Logger) -> Self {
        Self { logger }
    }
}

impl AsRef<Logger> for JsLogger {
    fn as_ref(&self) -> &Logger {
        &self.logger
    }
}

/// Builds a logger from a plain options object.
#[wasm_bindgen(js_name = getLogger)]
pub fn get_logger(name: Option<String>, options: JsValue) -> JsLogger {
    let options = converters::js_value_to_json(options)
        .unwrap_or_else(|err| serde_json::Value::String(format!("{err:?}")));
    Logger::with_json_options(name.unwrap_or_default(), options).into()
}

/// Async flavor of `getLogger` for dynamically imported callers.
#[wasm_bindgen(js_name = resolveAsync)]
pub async fn resolve_async(name: Option<String>, options: JsValue) -> JsLogger {
    let mut options = converters::js_value_to_json(options).unwrap_or(serde_json::Value::Null);
    match &mut options {
        serde_json::Value::Object(map) => {
            map.insert("dynamicImport".to_string(), true.into());
        }
        serde_json::Value::Null => {
            options = serde_json::json!({ "dynamicImport": true });
        }
        _ => {}
    }
    Logger::with_json_options(name.unwrap_or_default(), options).into()
}

#[wasm_bindgen]
impl JsLogger {
    #[wasm_bindgen(getter)]
    pub fn name(&self) -> String {
        self.logger.name().to_string()
    }

    /// Free-form level name; unknown names render with the INFO style.
    pub fn log(&self, level: &str, message: &str, meta: JsValue) {
        match converters::js_value_to_meta(meta) {
            Ok(meta) => {
                let site = js_call_site();
                self.logger.log_named_at(level, message, meta, Some(&site.caller));
            }
            Err(err) => self.unconverted(&normalize_label(level), message, err),
        }
    }

    pub fn info(&self, message: &str, meta: JsValue) {
        self.leveled(Level::Info, message, meta);
    }

    pub fn debug(&self, message: &str, meta: JsValue) {
        self.leveled(Level::Debug, message, meta);
    }

    pub fn warning(&self, message: &str, meta: JsValue) {
        self.leveled(Level::Warning, message, meta);
    }

    /// `error` may be a JS `Error`, a metadata object, or omitted.
    pub fn error(&self, message: &str, error: JsValue) {
        self.with_stack(Level::Error, message, error);
    }

    pub fn critical(&self, message: &str, error: JsValue) {
        self.with_stack(Level::Critical, message, error);
    }

    #[wasm_bindgen(js_name = getFullStack)]
    pub fn get_full_stack(&self) -> String {
        js_call_site().stack
    }

    #[wasm_bindgen(js_name = simulateLog)]
    pub fn simulate_log(&self, level: &str, message: &str, meta: JsValue) -> String {
        match converters::js_value_to_meta(meta) {
            Ok(meta) => self.logger.simulate_log(level, message, meta),
            Err(err) => format!("Error simulating log: {}", describe(&err)),
        }
    }

    /// Stops this logger from receiving uncaught errors.
    pub fn destroy(self) {
        self.logger.destroy();
    }
}

/// Logging never throws into JS: metadata that cannot be read degrades to
/// the plain fallback line.
impl JsLogger {
    fn leveled(&self, level: Level, message: &str, meta: JsValue) {
        match converters::js_value_to_meta(meta) {
            Ok(meta) => {
                let site = js_call_site();
                self.logger.log_at(level, message, meta, Some(&site.caller));
            }
            Err(err) => self.unconverted(level.as_str(), message, err),
        }
    }

    fn with_stack(&self, level: Level, message: &str, error: JsValue) {
        let input = match converters::js_value_to_error_input(error) {
            Ok(input) => input,
            Err(err) => return self.unconverted(level.as_str(), message, err),
        };
        let site = js_call_site();
        let meta = input.into_metadata_or(|| site.stack);
        self.logger.log_at(level, message, Some(meta), Some(&site.caller));
    }

    fn unconverted(&self, label: &str, message: &str, err: JsValue) {
        if Level::style_for(label) == Level::Debug && self.logger.options().is_production() {
            return;
        }
        self.logger.write_failure(label, message, describe(&err));
    }
}

fn describe(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}
