use crate::adapters::capture_backtrace;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const STACK_KEY: &str = "stack";

/// Whether the value under `stack` is treated as a backtrace. Anything else
/// (a number, an object) is an ordinary field.
fn is_stack_value(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Null)
}

/// Free-form fields attached to a record.
///
/// The `stack` key is reserved for a multi-line backtrace and is rendered as
/// its own block. An empty mapping means "no metadata".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(Map<String, Value>);

impl Metadata {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The backtrace stored under `stack`; null or blank values count as absent.
    pub fn stack(&self) -> Option<&str> {
        match self.0.get(STACK_KEY) {
            Some(Value::String(stack)) if !stack.trim().is_empty() => Some(stack),
            _ => None,
        }
    }

    pub fn set_stack(&mut self, stack: impl Into<String>) {
        self.0.insert(STACK_KEY.to_string(), Value::String(stack.into()));
    }

    /// True when anything besides a backtrace is present.
    pub fn has_fields(&self) -> bool {
        self.0.iter().any(|(key, value)| is_field(key, value))
    }

    /// Every field except the backtrace, for the `Meta:` block.
    pub fn fields(&self) -> Map<String, Value> {
        self.0
            .iter()
            .filter(|(key, value)| is_field(key, value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

fn is_field(key: &str, value: &Value) -> bool {
    key != STACK_KEY || !is_stack_value(value)
}

impl From<Map<String, Value>> for Metadata {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Objects become metadata as-is, `null` becomes empty metadata, and any
/// other value is kept under a `value` key.
impl From<Value> for Metadata {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            Value::Null => Self::new(),
            other => Self::new().with("value", other),
        }
    }
}

/// An error-like value: a message plus the backtrace captured where it arose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrowableInfo {
    pub message: String,
    pub backtrace: String,
}

impl ThrowableInfo {
    pub fn new(message: impl Into<String>, backtrace: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            backtrace: backtrace.into(),
        }
    }

    /// Stack text shaped like `Error: <message>` followed by the frames.
    /// `None` when no frames were recorded.
    pub fn stack(&self) -> Option<String> {
        if self.backtrace.trim().is_empty() {
            return None;
        }
        Some(format!("Error: {}\n{}", self.message, self.backtrace))
    }

    /// Builds a throwable from a Rust error and its `source()` chain.
    pub fn from_error<E: std::error::Error + ?Sized>(error: &E, backtrace: impl Into<String>) -> Self {
        let mut message = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        Self::new(message, backtrace)
    }
}

/// Second argument of `error` / `critical`: either a throwable whose
/// backtrace should be shown, or plain metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ErrorInput {
    #[default]
    None,
    Throwable(ThrowableInfo),
    Meta(Metadata),
}

impl ErrorInput {
    pub fn has_stack(&self) -> bool {
        match self {
            ErrorInput::None => false,
            ErrorInput::Throwable(throwable) => throwable.stack().is_some(),
            ErrorInput::Meta(meta) => meta.stack().is_some(),
        }
    }

    /// Flattens the input into metadata, moving a throwable's trace to `stack`.
    pub fn into_metadata(self) -> Metadata {
        match self {
            ErrorInput::None => Metadata::new(),
            ErrorInput::Throwable(throwable) => {
                let mut meta = Metadata::new();
                if let Some(stack) = throwable.stack() {
                    meta.set_stack(stack);
                }
                meta
            }
            ErrorInput::Meta(meta) => meta,
        }
    }

    /// Like `into_metadata`, but fills a missing `stack` from `trace`. A
    /// throwable keeps its `Error: <message>` line above the filled-in frames.
    pub fn into_metadata_or(self, trace: impl FnOnce() -> String) -> Metadata {
        let header = match &self {
            ErrorInput::Throwable(throwable) => Some(format!("Error: {}", throwable.message)),
            _ => None,
        };
        let mut meta = self.into_metadata();
        if meta.stack().is_none() {
            let trace = trace();
            meta.set_stack(match header {
                Some(header) => format!("{header}\n{trace}"),
                None => trace,
            });
        }
        meta
    }
}

impl From<ThrowableInfo> for ErrorInput {
    fn from(throwable: ThrowableInfo) -> Self {
        ErrorInput::Throwable(throwable)
    }
}

impl From<Metadata> for ErrorInput {
    fn from(meta: Metadata) -> Self {
        ErrorInput::Meta(meta)
    }
}

impl From<Value> for ErrorInput {
    fn from(value: Value) -> Self {
        ErrorInput::Meta(Metadata::from(value))
    }
}

/// A Rust error becomes a throwable whose frames start at the code that
/// converted it.
impl<E: std::error::Error + ?Sized> From<&E> for ErrorInput {
    fn from(error: &E) -> Self {
        ErrorInput::Throwable(ThrowableInfo::from_error(error, conversion_trace()))
    }
}

fn conversion_trace() -> String {
    let Ok(trace) = capture_backtrace() else {
        return String::new();
    };
    trace
        .frames()
        .iter()
        .skip_while(|frame| {
            let symbol = frame.strip_prefix("at ").unwrap_or(frame);
            symbol.trim_start_matches('<').starts_with("loglight::")
                || symbol.contains("core::convert::")
        })
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

impl From<Option<Metadata>> for ErrorInput {
    fn from(meta: Option<Metadata>) -> Self {
        meta.map_or(ErrorInput::None, ErrorInput::Meta)
    }
}
