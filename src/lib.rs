// Hexagonal architecture modules
pub mod adapters;
pub mod domain;
pub mod platform;
pub mod ports;

pub mod bridge;
pub mod errors;
pub mod logger;
pub mod monitor;

#[cfg(target_arch = "wasm32")]
pub mod facades;
#[cfg(target_arch = "wasm32")]
pub mod global;

pub use bridge::{init_log_bridge, LogBridge};
pub use domain::{
    ErrorInput, Level, LoggerOptions, Metadata, ModuleHost, PartialOptions, RuntimeEnvironment,
    ThrowableInfo,
};
pub use logger::{InstanceId, Logger, LoggerBuilder};
pub use monitor::{ErrorMonitor, MonitorState};
pub use platform::Platform;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start_app() -> Result<(), JsValue> {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    Ok(())
}
