use crate::errors::MonitorError;
use crate::monitor::ErrorMonitor;
use crate::ports::HostPort;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Weak;

/// Host double that counts install / uninstall calls and records
/// terminations instead of exiting.
#[derive(Debug)]
pub struct RecordingHost {
    supported: bool,
    fail_install: AtomicBool,
    installs: AtomicUsize,
    uninstalls: AtomicUsize,
    terminations: Mutex<Vec<i32>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::with_support(true)
    }

    /// A host without global error events; the monitor never installs.
    pub fn unsupported() -> Self {
        Self::with_support(false)
    }

    fn with_support(supported: bool) -> Self {
        Self {
            supported,
            fail_install: AtomicBool::new(false),
            installs: AtomicUsize::new(0),
            uninstalls: AtomicUsize::new(0),
            terminations: Mutex::new(Vec::new()),
        }
    }

    /// Make subsequent `install` calls fail.
    pub fn fail_installs(&self, fail: bool) {
        self.fail_install.store(fail, Ordering::SeqCst);
    }

    pub fn installs(&self) -> usize {
        self.installs.load(Ordering::SeqCst)
    }

    pub fn uninstalls(&self) -> usize {
        self.uninstalls.load(Ordering::SeqCst)
    }

    pub fn terminations(&self) -> Vec<i32> {
        self.terminations.lock().clone()
    }
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostPort for RecordingHost {
    fn supports_global_events(&self) -> bool {
        self.supported
    }

    fn install(&self, _monitor: Weak<ErrorMonitor>) -> Result<(), MonitorError> {
        if self.fail_install.load(Ordering::SeqCst) {
            return Err(MonitorError::install_failed("recording host refused"));
        }
        self.installs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn uninstall(&self) -> Result<(), MonitorError> {
        self.uninstalls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn terminate(&self, code: i32) {
        self.terminations.lock().push(code);
    }
}
