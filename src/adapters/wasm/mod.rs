/// WASM adapters - implementations using browser APIs.

pub mod backtrace;
pub mod clock;
pub mod console_sink;
pub mod converters;
pub mod host;

pub use backtrace::capture_backtrace;
pub use clock::Clock;
pub use console_sink::ConsoleSink;
pub use host::Host;

use crate::domain::ModuleHost;
use crate::global::window_with_document;

/// A page with a document is a browser; anything else running wasm
/// (workers, JS runtimes) resolves modules asynchronously.
pub fn probe_module_host() -> ModuleHost {
    if window_with_document().is_some() {
        ModuleHost::Browser
    } else {
        ModuleHost::Asynchronous
    }
}
