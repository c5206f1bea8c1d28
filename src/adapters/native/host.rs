use super::backtrace::capture_backtrace;
use crate::domain::{resolve_caller, ThrowableInfo};
use crate::errors::MonitorError;
use crate::monitor::{is_delivering, ErrorMonitor};
use crate::ports::HostPort;
use parking_lot::Mutex;
use std::panic::{self, PanicHookInfo};
use std::sync::{mpsc, Arc, Weak};
use std::thread;
use std::time::Duration;

const REPORT_TIMEOUT: Duration = Duration::from_secs(2);

type SharedHook = Arc<dyn Fn(&PanicHookInfo<'_>) + Sync + Send + 'static>;

/// Native host: panics are reported through the process panic hook.
///
/// Installing swaps in a hook that forwards to the monitor and keeps the
/// previous hook; uninstalling puts the previous hook back. The hook cannot
/// tell whether a panic will be caught, so it only reports; a panic nobody
/// catches still ends its thread (and, on the main thread, the process)
/// through the runtime. Panics raised by a logger while the monitor is
/// delivering to it go to the previous hook. Unhandled rejections have no
/// native source and are fed in through
/// `ErrorMonitor::report_unhandled_rejection`.
#[derive(Default)]
pub struct Host {
    previous: Mutex<Option<SharedHook>>,
}

impl Host {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HostPort for Host {
    fn supports_global_events(&self) -> bool {
        true
    }

    fn install(&self, monitor: Weak<ErrorMonitor>) -> Result<(), MonitorError> {
        // The std hook registry refuses changes from a panicking thread.
        if thread::panicking() {
            return Err(MonitorError::install_failed(
                "cannot replace the panic hook while panicking",
            ));
        }

        let mut previous = self.previous.lock();
        if previous.is_some() {
            return Ok(());
        }

        let prior: SharedHook = Arc::from(panic::take_hook());
        let fallback = prior.clone();
        panic::set_hook(Box::new(move |info: &PanicHookInfo<'_>| {
            if is_delivering() {
                return fallback(info);
            }
            match monitor.upgrade() {
                Some(monitor) if monitor.registered_count() > 0 => {
                    if !report_off_thread(monitor, throwable_from_panic(info)) {
                        fallback(info);
                    }
                }
                _ => fallback(info),
            }
        }));
        *previous = Some(prior);
        Ok(())
    }

    fn uninstall(&self) -> Result<(), MonitorError> {
        if thread::panicking() {
            return Err(MonitorError::install_failed(
                "cannot restore the panic hook while panicking",
            ));
        }

        let mut previous = self.previous.lock();
        let Some(prior) = previous.take() else {
            return Ok(());
        };
        let _ = panic::take_hook();
        panic::set_hook(Box::new(move |info: &PanicHookInfo<'_>| prior(info)));
        Ok(())
    }

    fn terminate(&self, code: i32) {
        std::process::exit(code);
    }
}

/// Loggers run on a separate thread: a second panic inside the hook itself
/// would abort the process. The wait is bounded because the panicking thread
/// may hold a lock the sinks need (stdout, for one). Returns whether the
/// report completed.
fn report_off_thread(monitor: Arc<ErrorMonitor>, report: ThrowableInfo) -> bool {
    let (done, finished) = mpsc::channel();
    let spawned = thread::Builder::new()
        .name("loglight-panic-report".to_string())
        .spawn(move || {
            monitor.report_panic(report);
            let _ = done.send(());
        });
    spawned.is_ok() && finished.recv_timeout(REPORT_TIMEOUT).is_ok()
}

/// Message, location and stack of a panic, in the shape of a thrown error.
pub fn throwable_from_panic(info: &PanicHookInfo<'_>) -> ThrowableInfo {
    let payload = info.payload();
    let reason = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "Box<dyn Any>".to_string());

    let trace = capture_backtrace()
        .map(|trace| trace.without_runtime_frames())
        .unwrap_or_default();

    let location = match info.location() {
        Some(location) => format!(
            "{}:{}:{}",
            location.file(),
            location.line(),
            location.column()
        ),
        None => resolve_caller(trace.frames(), 0),
    };

    ThrowableInfo::new(format!("{reason} at {location}"), trace.to_text())
}
