use super::converters::{describe_js_value, throwable_from_js};
use crate::domain::ThrowableInfo;
use crate::errors::MonitorError;
use crate::global::{dedicated_worker, global_event_target, window_with_document};
use crate::monitor::ErrorMonitor;
use crate::ports::HostPort;
use std::cell::RefCell;
use std::sync::Weak;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{ErrorEvent, EventTarget, PromiseRejectionEvent, Window};

type WindowErrorHandler = Closure<dyn FnMut(JsValue, JsValue, JsValue, JsValue, JsValue) -> bool>;

enum Installed {
    Window {
        window: Window,
        _handler: WindowErrorHandler,
        previous: Option<js_sys::Function>,
    },
    Global {
        target: EventTarget,
        on_error: Closure<dyn FnMut(ErrorEvent)>,
        on_rejection: Closure<dyn FnMut(PromiseRejectionEvent)>,
    },
}

thread_local! {
    static INSTALLED: RefCell<Option<Installed>> = const { RefCell::new(None) };
}

/// WASM host.
///
/// - Page with a document: a single `window.onerror` handler.
/// - Worker or JS runtime: `error` and `unhandledrejection` listeners on the
///   global scope.
///
/// Closures live in thread-local storage; the wasm host is single-threaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct Host;

impl Host {
    pub fn new() -> Self {
        Self
    }
}

impl HostPort for Host {
    fn supports_global_events(&self) -> bool {
        true
    }

    fn install(&self, monitor: Weak<ErrorMonitor>) -> Result<(), MonitorError> {
        INSTALLED.with(|slot| {
            let mut slot = slot.borrow_mut();
            if slot.is_some() {
                return Ok(());
            }
            let installed = match window_with_document() {
                Some(window) => install_window(window, monitor),
                None => install_global(monitor)?,
            };
            *slot = Some(installed);
            Ok(())
        })
    }

    fn uninstall(&self) -> Result<(), MonitorError> {
        let Some(installed) = INSTALLED.with(|slot| slot.borrow_mut().take()) else {
            return Ok(());
        };

        match &installed {
            Installed::Window {
                window, previous, ..
            } => window.set_onerror(previous.as_ref()),
            Installed::Global {
                target,
                on_error,
                on_rejection,
            } => {
                let _ = target
                    .remove_event_listener_with_callback("error", on_error.as_ref().unchecked_ref());
                let _ = target.remove_event_listener_with_callback(
                    "unhandledrejection",
                    on_rejection.as_ref().unchecked_ref(),
                );
            }
        }

        // Uninstall can run from inside one of these closures (the last logger
        // dropped during fan-out); free them once the current task is done.
        wasm_bindgen_futures::spawn_local(async move {
            drop(installed);
        });
        Ok(())
    }

    fn terminate(&self, _code: i32) {
        if let Some(worker) = dedicated_worker() {
            worker.close();
        }
    }
}

fn install_window(window: Window, monitor: Weak<ErrorMonitor>) -> Installed {
    let previous = window.onerror();
    let handler = Closure::wrap(Box::new(
        move |message: JsValue, _source: JsValue, _line: JsValue, _column: JsValue, error: JsValue| {
            match monitor.upgrade() {
                Some(monitor) => monitor
                    .handle_browser_error(&describe_js_value(&message), throwable_from_js(&error)),
                None => false,
            }
        },
    ) as Box<dyn FnMut(JsValue, JsValue, JsValue, JsValue, JsValue) -> bool>);
    window.set_onerror(Some(handler.as_ref().unchecked_ref()));

    Installed::Window {
        window,
        _handler: handler,
        previous,
    }
}

fn install_global(monitor: Weak<ErrorMonitor>) -> Result<Installed, MonitorError> {
    let target = global_event_target();

    let error_monitor = monitor.clone();
    let on_error = Closure::wrap(Box::new(move |event: ErrorEvent| {
        if let Some(monitor) = error_monitor.upgrade() {
            let throwable = throwable_from_js(&event.error())
                .unwrap_or_else(|| ThrowableInfo::new(event.message(), ""));
            monitor.handle_uncaught(throwable);
        }
    }) as Box<dyn FnMut(ErrorEvent)>);

    let on_rejection = Closure::wrap(Box::new(move |event: PromiseRejectionEvent| {
        if let Some(monitor) = monitor.upgrade() {
            monitor.report_unhandled_rejection(describe_js_value(&event.reason()));
        }
    }) as Box<dyn FnMut(PromiseRejectionEvent)>);

    target
        .add_event_listener_with_callback("error", on_error.as_ref().unchecked_ref())
        .map_err(|err| MonitorError::install_failed(describe_js_value(&err)))?;

    if let Err(err) = target
        .add_event_listener_with_callback("unhandledrejection", on_rejection.as_ref().unchecked_ref())
    {
        let _ = target.remove_event_listener_with_callback("error", on_error.as_ref().unchecked_ref());
        return Err(MonitorError::install_failed(describe_js_value(&err)));
    }

    Ok(Installed::Global {
        target,
        on_error,
        on_rejection,
    })
}
