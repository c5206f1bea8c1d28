/// Shared adapters - target-independent implementations, mostly test doubles.

pub mod fixed_clock;
pub mod memory_sink;
pub mod recording_host;

pub use fixed_clock::FixedClock;
pub use memory_sink::{MemorySink, SinkEntry};
pub use recording_host::RecordingHost;
