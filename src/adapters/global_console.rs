/// Global console sink - automatically selects implementation based on build target.
///
/// Supports both WASM (browser console) and native (stdout/stderr) platforms.
/// The correct implementation is selected at compile time based on the target architecture.

use crate::ports::ConsoleSinkPort;
use once_cell::sync::Lazy;
use std::sync::Arc;

#[cfg(target_arch = "wasm32")]
use crate::adapters::wasm::ConsoleSink;
#[cfg(not(target_arch = "wasm32"))]
use crate::adapters::native::ConsoleSink;

static CONSOLE: Lazy<Arc<ConsoleSink>> = Lazy::new(|| Arc::new(ConsoleSink::new()));

/// Get the global console sink.
#[inline]
pub fn console() -> Arc<dyn ConsoleSinkPort> {
    CONSOLE.clone()
}
