/// Ports module - Defines the interfaces (traits) that abstract platform-specific functionality.
///
/// The logger and the error monitor only talk to the console, the clock and
/// the host runtime through these traits, so the same code drives a terminal,
/// a browser tab, a worker, or an in-memory test double.

pub mod clock;
pub mod console;
pub mod host;

pub use clock::ClockPort;
pub use console::ConsoleSinkPort;
pub use host::HostPort;
