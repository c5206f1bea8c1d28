/// Adapters module - platform-specific implementations of ports.

pub mod global_clock;
pub mod global_console;
pub mod shared;

#[cfg(target_arch = "wasm32")]
pub mod wasm;
#[cfg(not(target_arch = "wasm32"))]
pub mod native;

#[cfg(target_arch = "wasm32")]
pub use wasm::{capture_backtrace, probe_module_host, Clock, ConsoleSink, Host};
#[cfg(not(target_arch = "wasm32"))]
pub use native::{capture_backtrace, probe_module_host, Clock, ConsoleSink, Host};

pub use global_clock::clock;
pub use global_console::console;
pub use shared::{FixedClock, MemorySink, RecordingHost, SinkEntry};

use crate::ports::HostPort;
use std::sync::Arc;

/// Host adapter for the current build target.
pub fn host() -> Arc<dyn HostPort> {
    Arc::new(Host::new())
}
