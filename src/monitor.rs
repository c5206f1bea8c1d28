//! Process-wide (or page-wide) safety net for uncaught errors.
//!
//! Loggers register on construction and unregister on disposal. Handlers are
//! attached to the host while at least one logger is registered, and every
//! event is fanned out to all registered loggers.

use crate::domain::{Metadata, ThrowableInfo};
use crate::logger::{InstanceId, Logger, LoggerCore};
use crate::ports::HostPort;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::cell::Cell;
use std::collections::BTreeMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};

pub const FATAL_EXIT_CODE: i32 = 1;

static GLOBAL_MONITOR: Lazy<Arc<ErrorMonitor>> =
    Lazy::new(|| ErrorMonitor::new(crate::adapters::host()));

thread_local! {
    static DELIVERING: Cell<bool> = const { Cell::new(false) };
}

/// True while this thread is handing an event to a logger. Host handlers
/// must not route errors raised in that window back into the monitor.
pub fn is_delivering() -> bool {
    DELIVERING.with(Cell::get)
}

struct DeliveryScope {
    outer: bool,
}

impl DeliveryScope {
    fn enter() -> Self {
        Self {
            outer: DELIVERING.with(|flag| flag.replace(true)),
        }
    }
}

impl Drop for DeliveryScope {
    fn drop(&mut self) {
        DELIVERING.with(|flag| flag.set(self.outer));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonitorState {
    #[default]
    Uninstalled,
    Installed,
}

#[derive(Default)]
struct Registry {
    /// Keyed by id so iteration follows registration order.
    members: BTreeMap<InstanceId, Weak<LoggerCore>>,
    state: MonitorState,
}

pub struct ErrorMonitor {
    host: Arc<dyn HostPort>,
    registry: Mutex<Registry>,
    this: Weak<ErrorMonitor>,
}

impl fmt::Debug for ErrorMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.lock();
        f.debug_struct("ErrorMonitor")
            .field("state", &registry.state)
            .field("registered", &registry.members.len())
            .finish()
    }
}

impl ErrorMonitor {
    /// An isolated monitor bound to `host`.
    pub fn new(host: Arc<dyn HostPort>) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            host,
            registry: Mutex::new(Registry::default()),
            this: this.clone(),
        })
    }

    /// The monitor shared by every logger that was not given its own.
    pub fn global() -> Arc<ErrorMonitor> {
        GLOBAL_MONITOR.clone()
    }

    pub fn state(&self) -> MonitorState {
        self.registry.lock().state
    }

    pub fn registered_count(&self) -> usize {
        self.registry
            .lock()
            .members
            .values()
            .filter(|member| member.strong_count() > 0)
            .count()
    }

    pub fn is_registered(&self, id: InstanceId) -> bool {
        self.registry.lock().members.contains_key(&id)
    }

    /// Adds `logger` to the registry, installing host handlers on the first
    /// registration. Returns false if it was already registered.
    pub fn register(&self, logger: &Logger) -> bool {
        let mut registry = self.registry.lock();
        if registry.members.contains_key(&logger.id()) {
            return false;
        }
        registry
            .members
            .insert(logger.id(), Arc::downgrade(logger.core()));

        if registry.state == MonitorState::Uninstalled && self.host.supports_global_events() {
            match self.host.install(self.this.clone()) {
                Ok(()) => registry.state = MonitorState::Installed,
                Err(err) => {
                    drop(registry);
                    logger
                        .platform()
                        .sink()
                        .warn(&format!("Failed to set up global error monitoring: {err}"));
                }
            }
        }
        true
    }

    /// Removes `id`; detaches host handlers once nobody is left.
    /// Returns false if `id` was not registered.
    pub fn unregister(&self, id: InstanceId) -> bool {
        let mut registry = self.registry.lock();
        if registry.members.remove(&id).is_none() {
            return false;
        }
        registry.members.retain(|_, member| member.strong_count() > 0);

        if registry.members.is_empty() && registry.state == MonitorState::Installed {
            // On failure the handlers are still attached, so the state stays
            // Installed and the next emptying retries.
            if self.host.uninstall().is_ok() {
                registry.state = MonitorState::Uninstalled;
            }
        }
        true
    }

    /// Reports an uncaught error to every registered logger, then asks the
    /// host to terminate unless every one of them opted out.
    /// Returns whether termination was requested.
    pub fn handle_uncaught(&self, error: ThrowableInfo) -> bool {
        let message = format!("Uncaught Exception: {}", error.message);
        let recipients = self.fan_out(|logger| logger.error_with(&message, error.clone()));

        let terminate = recipients
            .iter()
            .any(|logger| logger.options().exit_on_fatal_error);
        drop(recipients);

        if terminate {
            self.host.terminate(FATAL_EXIT_CODE);
        }
        terminate
    }

    /// Reports a panic at ERROR. Never terminates: the panic may still be
    /// caught, and one that is not ends its thread through the runtime.
    pub fn report_panic(&self, panic: ThrowableInfo) {
        let message = format!("Panic: {}", panic.message);
        self.fan_out(|logger| logger.error_with(&message, panic.clone()));
    }

    /// Reports a rejected future or promise nobody awaited. Never terminates.
    pub fn report_unhandled_rejection(&self, reason: impl fmt::Display) {
        let reason = reason.to_string();
        let message = format!("Unhandled Promise Rejection: {reason}");
        let meta = Metadata::new().with("reason", reason);
        self.fan_out(|logger| logger.warning_with(&message, meta.clone()));
    }

    /// Reports a `window.onerror` event. Returns true when the browser's own
    /// report should be suppressed, i.e. when any notified logger asks for it.
    pub fn handle_browser_error(&self, message: &str, error: Option<ThrowableInfo>) -> bool {
        let message = format!("Browser Error: {message}");
        let recipients = self.fan_out(|logger| match &error {
            Some(error) => logger.error_with(&message, error.clone()),
            None => logger.error(&message),
        });
        recipients
            .iter()
            .any(|logger| logger.options().suppress_browser_errors)
    }

    /// Delivers to a snapshot of the live members taken up front, so members
    /// leaving mid-delivery neither skip nor repeat anyone. One logger
    /// panicking does not stop the others.
    fn fan_out(&self, deliver: impl Fn(&Logger)) -> Vec<Logger> {
        let recipients = self.snapshot();
        for logger in &recipients {
            let _scope = DeliveryScope::enter();
            let _ = panic::catch_unwind(AssertUnwindSafe(|| deliver(logger)));
        }
        recipients
    }

    fn snapshot(&self) -> Vec<Logger> {
        let registry = self.registry.lock();
        registry
            .members
            .values()
            .filter_map(Weak::upgrade)
            .map(Logger::from_core)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{MemorySink, RecordingHost};
    use crate::domain::PartialOptions;
    use crate::platform::Platform;

    fn setup() -> (Arc<RecordingHost>, Arc<ErrorMonitor>, Arc<MemorySink>) {
        let host = Arc::new(RecordingHost::new());
        let monitor = ErrorMonitor::new(host.clone());
        (host, monitor, Arc::new(MemorySink::new()))
    }

    fn logger(name: &str, monitor: &Arc<ErrorMonitor>, sink: &Arc<MemorySink>) -> Logger {
        Logger::builder()
            .name(name)
            .options(PartialOptions::new().with_colorize(false))
            .monitor(monitor.clone())
            .platform(Platform::new().with_sink(sink.clone()))
            .build()
    }

    #[test]
    fn test_install_on_first_register_only() {
        let (host, monitor, sink) = setup();
        assert_eq!(monitor.state(), MonitorState::Uninstalled);

        let a = logger("a", &monitor, &sink);
        let b = logger("b", &monitor, &sink);
        assert_eq!(monitor.state(), MonitorState::Installed);
        assert_eq!(host.installs(), 1);
        assert_eq!(monitor.registered_count(), 2);

        drop((a, b));
    }

    #[test]
    fn test_register_is_idempotent() {
        let (host, monitor, sink) = setup();
        let a = logger("a", &monitor, &sink);
        assert!(!monitor.register(&a));
        assert_eq!(monitor.registered_count(), 1);
        assert_eq!(host.installs(), 1);
    }

    #[test]
    fn test_unregister_unknown_id() {
        let (_host, monitor, sink) = setup();
        let a = logger("a", &monitor, &sink);
        let id = a.id();
        a.destroy();
        assert!(!monitor.unregister(id));
    }

    #[test]
    fn test_unsupported_host_never_installs() {
        let host = Arc::new(RecordingHost::unsupported());
        let monitor = ErrorMonitor::new(host.clone());
        let sink = Arc::new(MemorySink::new());
        let a = logger("a", &monitor, &sink);
        assert!(monitor.is_registered(a.id()));
        assert_eq!(monitor.state(), MonitorState::Uninstalled);
        assert_eq!(host.installs(), 0);
    }

    #[test]
    fn test_failed_install_warns_and_retries() {
        let (host, monitor, sink) = setup();
        host.fail_installs(true);
        let _a = logger("a", &monitor, &sink);
        assert_eq!(monitor.state(), MonitorState::Uninstalled);
        assert!(sink.warnings()[0].starts_with("Failed to set up global error monitoring"));

        host.fail_installs(false);
        let _b = logger("b", &monitor, &sink);
        assert_eq!(monitor.state(), MonitorState::Installed);
        assert_eq!(host.installs(), 1);
    }

    #[test]
    fn test_rejection_is_a_warning_without_exit() {
        let (host, monitor, sink) = setup();
        let _a = logger("a", &monitor, &sink);
        monitor.report_unhandled_rejection("timeout");

        let text = sink.text();
        assert!(text.contains("[a] [WARNING]"));
        assert!(text.contains("Unhandled Promise Rejection: timeout"));
        assert!(text.contains("\"reason\": \"timeout\""));
        assert!(host.terminations().is_empty());
    }

    #[test]
    fn test_debug_output_reports_state() {
        let (_host, monitor, sink) = setup();
        let _a = logger("a", &monitor, &sink);
        let debug = format!("{monitor:?}");
        assert!(debug.contains("Installed"));
        assert!(debug.contains("registered: 1"));
    }

    #[test]
    fn test_panic_report_never_terminates() {
        let (host, monitor, sink) = setup();
        let _a = logger("a", &monitor, &sink);
        monitor.report_panic(ThrowableInfo::new("index out of bounds at src/lib.rs:3:7", "at lib::get"));

        let text = sink.text();
        assert!(text.contains("[a] [ERROR]"));
        assert!(text.contains("Panic: index out of bounds at src/lib.rs:3:7"));
        assert!(text.contains("Error: index out of bounds at src/lib.rs:3:7\nat lib::get"));
        assert!(host.terminations().is_empty());
    }

    #[test]
    fn test_delivery_flag_is_scoped() {
        let (_host, monitor, sink) = setup();
        let _a = logger("a", &monitor, &sink);
        assert!(!is_delivering());

        let seen = Mutex::new(Vec::new());
        monitor.fan_out(|_| seen.lock().push(is_delivering()));
        assert_eq!(*seen.lock(), vec![true]);
        assert!(!is_delivering());

        {
            let _outer = DeliveryScope::enter();
            monitor.fan_out(|_| {});
            assert!(is_delivering());
        }
        assert!(!is_delivering());
    }
}
