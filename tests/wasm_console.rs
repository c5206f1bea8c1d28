#![cfg(target_arch = "wasm32")]

extern crate wasm_bindgen_test;
use loglight::adapters::{MemorySink, RecordingHost};
use loglight::facades::wasm::logger::{get_logger, resolve_async, JsLogger};
use loglight::{ErrorMonitor, Logger, ModuleHost, PartialOptions, Platform, RuntimeEnvironment};
use std::sync::Arc;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn test_probe_detects_browser() {
    let env = RuntimeEnvironment::probe();
    assert_eq!(env.host(), ModuleHost::Browser);
    assert!(env.is_browser_like());
}

#[wasm_bindgen_test]
fn test_browser_logger_writes_groups() {
    let sink = Arc::new(MemorySink::new());
    let log = Logger::builder()
        .name("page")
        .options(PartialOptions::new().with_exit_on_fatal_error(false))
        .platform(Platform::new().with_sink(sink.clone()))
        .monitor(ErrorMonitor::new(Arc::new(RecordingHost::new())))
        .build();
    log.info("hello");
    assert_eq!(sink.len(), 1);
    assert!(sink.text().starts_with("[page] [INFO]"));
}

#[wasm_bindgen_test]
fn test_real_monitor_installs_onerror() {
    let window = web_sys::window().unwrap();
    let before = window.onerror();
    let log = Logger::new("page", PartialOptions::new().with_exit_on_fatal_error(false));
    assert!(window.onerror().is_some());
    log.destroy();
    assert_eq!(window.onerror().is_some(), before.is_some());
}

#[wasm_bindgen_test]
fn test_facade_logger_methods() {
    let log = get_logger(Some("facade".to_string()), JsValue::UNDEFINED);
    assert_eq!(log.name(), "facade");
    log.info("from js", JsValue::UNDEFINED);
    log.error("failed", js_sys::Error::new("boom").into());
    assert!(!log.get_full_stack().is_empty());
    log.destroy();
}

#[wasm_bindgen_test]
async fn test_facade_resolve_async() {
    let log = resolve_async(None, JsValue::UNDEFINED).await;
    assert_eq!(log.name(), "root");
    log.destroy();
}

#[wasm_bindgen_test]
fn test_unreadable_meta_falls_back_without_throwing() {
    let sink = Arc::new(MemorySink::new());
    let log: JsLogger = Logger::builder()
        .name("page")
        .options(PartialOptions::new().with_exit_on_fatal_error(false))
        .platform(Platform::new().with_sink(sink.clone()))
        .monitor(ErrorMonitor::new(Arc::new(RecordingHost::new())))
        .build()
        .into();
    let symbol: JsValue = js_sys::Symbol::for_("opaque").into();

    log.warning("quota low", symbol.clone());
    assert_eq!(sink.lines(), vec!["[WARNING] quota low (logging failed)".to_string()]);
    assert!(sink.warnings()[0].starts_with("Failed to log [WARNING]: "));

    assert!(log
        .simulate_log("info", "x", symbol)
        .starts_with("Error simulating log: "));
}
