use crate::adapters::capture_backtrace;
use crate::domain::caller::STACK_UNAVAILABLE;
use crate::domain::options::DEFAULT_NAME;
use crate::domain::{
    try_resolve_full_backtrace, Backtrace, ErrorInput, Level, LevelFormatter, LogRecord,
    LoggerOptions, Metadata, PartialOptions, RenderedOutput,
};
use crate::errors::BacktraceError;
use crate::monitor::ErrorMonitor;
use crate::platform::Platform;
use serde_json::Value;
use std::fmt;
use std::panic::Location;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a logger instance. Two loggers may share a name, never an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceId(u64);

impl InstanceId {
    fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub(crate) struct LoggerCore {
    id: InstanceId,
    name: String,
    options: LoggerOptions,
    formatter: LevelFormatter,
    platform: Platform,
    monitor: Arc<ErrorMonitor>,
}

impl Drop for LoggerCore {
    fn drop(&mut self) {
        self.monitor.unregister(self.id);
    }
}

/// A named, configured logger.
///
/// Cloning is cheap and yields a handle to the same instance. The instance
/// stays registered with its `ErrorMonitor` until `destroy` is called or the
/// last handle is dropped.
#[derive(Clone)]
pub struct Logger {
    core: Arc<LoggerCore>,
}

impl Logger {
    /// Creates a logger registered with the global monitor.
    pub fn new(name: impl Into<String>, options: PartialOptions) -> Self {
        Self::builder().name(name).options(options).build()
    }

    /// The `"root"` logger with default options.
    pub fn root() -> Self {
        Self::new(DEFAULT_NAME, PartialOptions::new())
    }

    /// Creates a logger from camelCase JSON options. Unreadable options fall
    /// back to the built-in defaults with a warning on the console.
    pub fn with_json_options(name: impl Into<String>, options: Value) -> Self {
        Self::builder().name(name).json_options(options).build()
    }

    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    /// Factory equivalent to `Logger::new`.
    pub fn get_logger(name: impl Into<String>, options: PartialOptions) -> Self {
        Self::new(name, options)
    }

    /// Factory for callers that obtain their logger asynchronously.
    ///
    /// Resolves right away to the same logger `get_logger` would build, tagged
    /// with `dynamicImport: true` in its extra options. It cannot fail.
    pub async fn resolve_async(name: impl Into<String>, options: PartialOptions) -> Self {
        Self::get_logger(name, options.with_extra("dynamicImport", true))
    }

    pub(crate) fn from_core(core: Arc<LoggerCore>) -> Self {
        Self { core }
    }

    pub(crate) fn core(&self) -> &Arc<LoggerCore> {
        &self.core
    }

    pub fn id(&self) -> InstanceId {
        self.core.id
    }

    pub fn name(&self) -> &str {
        &self.core.name
    }

    pub fn options(&self) -> &LoggerOptions {
        &self.core.options
    }

    pub fn platform(&self) -> &Platform {
        &self.core.platform
    }

    pub fn monitor(&self) -> &Arc<ErrorMonitor> {
        &self.core.monitor
    }

    /// Writes one record at `level`.
    #[track_caller]
    pub fn log(&self, level: Level, message: impl AsRef<str>, meta: Option<Metadata>) {
        let caller = self.caller(Location::caller());
        self.emit(
            level.as_str(),
            level,
            message.as_ref(),
            meta.as_ref(),
            caller.as_deref(),
        );
    }

    /// Writes one record under a free-form level name. Names outside the
    /// known set keep their upper-cased text and use the INFO style.
    #[track_caller]
    pub fn log_named(&self, level: &str, message: impl AsRef<str>, meta: Option<Metadata>) {
        let caller = self.caller(Location::caller());
        self.log_named_at(level, message, meta, caller.as_deref());
    }

    /// `log_named` with an explicit caller location.
    pub fn log_named_at(
        &self,
        level: &str,
        message: impl AsRef<str>,
        meta: Option<Metadata>,
        caller: Option<&str>,
    ) {
        let label = normalize_label(level);
        self.emit(
            &label,
            Level::style_for(&label),
            message.as_ref(),
            meta.as_ref(),
            caller,
        );
    }

    /// Writes one record with an explicit caller location, for records that
    /// originate elsewhere (the `log` bridge).
    pub fn log_at(
        &self,
        level: Level,
        message: impl AsRef<str>,
        meta: Option<Metadata>,
        caller: Option<&str>,
    ) {
        self.emit(level.as_str(), level, message.as_ref(), meta.as_ref(), caller);
    }

    #[track_caller]
    pub fn info(&self, message: impl AsRef<str>) {
        self.log(Level::Info, message, None);
    }

    #[track_caller]
    pub fn info_with(&self, message: impl AsRef<str>, meta: impl Into<Metadata>) {
        self.log(Level::Info, message, Some(meta.into()));
    }

    #[track_caller]
    pub fn debug(&self, message: impl AsRef<str>) {
        self.log(Level::Debug, message, None);
    }

    #[track_caller]
    pub fn debug_with(&self, message: impl AsRef<str>, meta: impl Into<Metadata>) {
        self.log(Level::Debug, message, Some(meta.into()));
    }

    #[track_caller]
    pub fn warning(&self, message: impl AsRef<str>) {
        self.log(Level::Warning, message, None);
    }

    #[track_caller]
    pub fn warning_with(&self, message: impl AsRef<str>, meta: impl Into<Metadata>) {
        self.log(Level::Warning, message, Some(meta.into()));
    }

    /// ERROR record carrying the backtrace of this call site.
    #[track_caller]
    pub fn error(&self, message: impl AsRef<str>) {
        let trace = capture_backtrace();
        self.log_with_trace(Level::Error, message.as_ref(), ErrorInput::None, Some(trace));
    }

    /// ERROR record for a throwable or metadata. A throwable's backtrace is
    /// shown as the stack; without one, this call site's backtrace is used.
    #[track_caller]
    pub fn error_with(&self, message: impl AsRef<str>, input: impl Into<ErrorInput>) {
        let input = input.into();
        let trace = if input.has_stack() {
            None
        } else {
            Some(capture_backtrace())
        };
        self.log_with_trace(Level::Error, message.as_ref(), input, trace);
    }

    #[track_caller]
    pub fn critical(&self, message: impl AsRef<str>) {
        let trace = capture_backtrace();
        self.log_with_trace(Level::Critical, message.as_ref(), ErrorInput::None, Some(trace));
    }

    #[track_caller]
    pub fn critical_with(&self, message: impl AsRef<str>, input: impl Into<ErrorInput>) {
        let input = input.into();
        let trace = if input.has_stack() {
            None
        } else {
            Some(capture_backtrace())
        };
        self.log_with_trace(Level::Critical, message.as_ref(), input, trace);
    }

    /// Backtrace of the code calling this method, one frame per line.
    #[inline(never)]
    pub fn get_full_stack(&self) -> String {
        try_resolve_full_backtrace(capture_backtrace())
    }

    /// Renders a record the way it would be written, without writing it.
    #[track_caller]
    pub fn simulate_log(
        &self,
        level: &str,
        message: impl AsRef<str>,
        meta: Option<Metadata>,
    ) -> String {
        let label = normalize_label(level);
        let caller = self.caller(Location::caller());
        let record = self.record(
            &label,
            Level::style_for(&label),
            message.as_ref(),
            meta.as_ref(),
            caller.as_deref(),
        );
        self.core
            .formatter
            .render_preview(&record, &self.core.options)
            .unwrap_or_else(|err| format!("Error simulating log: {err}"))
    }

    /// Unregisters from the monitor. Other clones of this handle stay usable
    /// but are no longer notified of uncaught errors.
    pub fn destroy(self) {
        self.core.monitor.unregister(self.core.id);
    }

    #[track_caller]
    fn log_with_trace(
        &self,
        level: Level,
        message: &str,
        input: ErrorInput,
        trace: Option<Result<Backtrace, BacktraceError>>,
    ) {
        let meta = input.into_metadata_or(|| {
            trace
                .map(try_resolve_full_backtrace)
                .unwrap_or_else(|| STACK_UNAVAILABLE.to_string())
        });
        self.log(level, message, Some(meta));
    }

    fn caller(&self, location: &Location<'_>) -> Option<String> {
        self.core.options.show_caller.then(|| {
            format!(
                "{}:{}:{}",
                location.file(),
                location.line(),
                location.column()
            )
        })
    }

    fn record<'a>(
        &'a self,
        label: &'a str,
        level: Level,
        message: &'a str,
        meta: Option<&'a Metadata>,
        caller: Option<&'a str>,
    ) -> LogRecord<'a> {
        LogRecord {
            name: &self.core.name,
            label,
            level,
            message,
            meta,
            timestamp: self.core.platform.clock().now(),
            caller,
        }
    }

    fn emit(
        &self,
        label: &str,
        level: Level,
        message: &str,
        meta: Option<&Metadata>,
        caller: Option<&str>,
    ) {
        let record = self.record(label, level, message, meta, caller);
        let sink = self.core.platform.sink();
        match self.core.formatter.format(&record, &self.core.options) {
            Ok(Some(RenderedOutput::Lines(lines))) => {
                for line in &lines {
                    sink.line(line);
                }
            }
            Ok(Some(RenderedOutput::Group {
                label: group_label,
                body,
            })) => sink.group(&group_label, &body),
            Ok(None) => {}
            Err(err) => self.write_failure(label, message, err),
        }
    }

    /// Fallback output for a record that could not be rendered: a warning
    /// with the reason plus the bare label and message.
    pub(crate) fn write_failure(&self, label: &str, message: &str, reason: impl fmt::Display) {
        let sink = self.core.platform.sink();
        sink.warn(&format!("Failed to log [{label}]: {reason}"));
        sink.line(&format!("[{label}] {message} (logging failed)"));
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("id", &self.core.id)
            .field("name", &self.core.name)
            .field("options", &self.core.options)
            .finish()
    }
}

pub(crate) fn normalize_label(level: &str) -> String {
    let label = level.trim().to_uppercase();
    if label.is_empty() {
        Level::Info.as_str().to_string()
    } else {
        label
    }
}

/// Assembles a `Logger` with injected collaborators.
///
/// Anything left unset uses the defaults: the platform console and clock,
/// the probed environment, and `ErrorMonitor::global()`.
#[derive(Default)]
pub struct LoggerBuilder {
    name: Option<String>,
    options: Option<PartialOptions>,
    json_options: Option<Value>,
    platform: Option<Platform>,
    monitor: Option<Arc<ErrorMonitor>>,
}

impl LoggerBuilder {
    /// Empty or blank names become `"root"`.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn options(mut self, options: PartialOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// camelCase JSON options; takes precedence over `options`.
    pub fn json_options(mut self, options: Value) -> Self {
        self.json_options = Some(options);
        self
    }

    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn monitor(mut self, monitor: Arc<ErrorMonitor>) -> Self {
        self.monitor = Some(monitor);
        self
    }

    /// Builds and registers the logger. Never fails.
    pub fn build(self) -> Logger {
        let platform = self.platform.unwrap_or_default();
        let monitor = self.monitor.unwrap_or_else(ErrorMonitor::global);
        let ambient = platform.environment().default_environment().to_string();

        let options = match self.json_options.map(PartialOptions::from_json) {
            None => self.options.unwrap_or_default().resolve(&ambient),
            Some(Ok(partial)) => partial.resolve(&ambient),
            Some(Err(err)) => {
                platform
                    .sink()
                    .warn(&format!("Failed to initialize options: {err}"));
                LoggerOptions::fallback()
            }
        };

        let name = self
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_NAME.to_string());

        let formatter = LevelFormatter::new(platform.environment().is_browser_like());
        let logger = Logger::from_core(Arc::new(LoggerCore {
            id: InstanceId::next(),
            name,
            options,
            formatter,
            platform,
            monitor: monitor.clone(),
        }));
        monitor.register(&logger);
        logger
    }
}
