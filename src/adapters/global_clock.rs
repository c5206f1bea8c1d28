use crate::ports::clock::ClockPort;
use once_cell::sync::Lazy;
use std::sync::Arc;

#[cfg(target_arch = "wasm32")]
use crate::adapters::wasm::Clock;
#[cfg(not(target_arch = "wasm32"))]
use crate::adapters::native::Clock;

static CLOCK: Lazy<Arc<Clock>> = Lazy::new(|| Arc::new(Clock::new()));

/// Returns the global clock instance
pub fn clock() -> Arc<dyn ClockPort> {
    CLOCK.clone()
}
