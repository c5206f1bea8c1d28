/// Native adapters - implementations for native Rust (non-WASM).

pub mod backtrace;
pub mod clock;
pub mod console_sink;
pub mod host;

pub use backtrace::capture_backtrace;
pub use clock::Clock;
pub use console_sink::ConsoleSink;
pub use host::Host;

use crate::domain::ModuleHost;

/// A native process always loads its code synchronously.
pub fn probe_module_host() -> ModuleHost {
    ModuleHost::Synchronous
}
