use crate::errors::MonitorError;
use crate::monitor::ErrorMonitor;
use std::sync::Weak;

/// Host port - attaches the error monitor to the runtime's global error events.
///
/// - Native: the process panic hook
/// - Browser: `window.onerror`
/// - Worker: the global scope's `error` / `unhandledrejection` events
///
/// A host installs exactly one handler set per `install` call; the monitor
/// guarantees `install` and `uninstall` alternate.
pub trait HostPort: Send + Sync {
    /// Whether the host exposes process-level or page-level error events at all.
    fn supports_global_events(&self) -> bool;

    /// Attach handlers that forward events to `monitor`.
    fn install(&self, monitor: Weak<ErrorMonitor>) -> Result<(), MonitorError>;

    /// Detach the handlers attached by `install`, restoring what was there before.
    fn uninstall(&self) -> Result<(), MonitorError>;

    /// Terminate after a fatal error has been reported.
    fn terminate(&self, code: i32);
}
