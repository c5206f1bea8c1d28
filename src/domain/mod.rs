pub mod caller;
pub mod environment;
pub mod formatter;
pub mod level;
pub mod metadata;
pub mod options;

pub use caller::{
    resolve_caller, resolve_full_backtrace, try_resolve_caller, try_resolve_full_backtrace,
    Backtrace,
};
pub use environment::{ModuleHost, RuntimeEnvironment};
pub use formatter::{LevelFormatter, LogRecord, RenderedOutput};
pub use level::Level;
pub use metadata::{ErrorInput, Metadata, ThrowableInfo};
pub use options::{LoggerOptions, PartialOptions};
