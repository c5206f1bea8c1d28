use crate::errors::OptionsError;
use serde::Deserialize;
use serde_json::{Map, Value};

pub const DEFAULT_NAME: &str = "root";
pub const DEVELOPMENT: &str = "development";
pub const PRODUCTION: &str = "production";

/// Resolved, immutable configuration of one logger.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggerOptions {
    pub show_timestamp: bool,
    pub show_caller: bool,
    pub environment: String,
    /// Terminate after an uncaught panic has been reported.
    pub exit_on_fatal_error: bool,
    /// Ask the browser to skip its own report after `window.onerror` fired.
    pub suppress_browser_errors: bool,
    /// Wrap terminal output in ANSI colors.
    pub colorize: bool,
    /// Caller-supplied fields with no meaning to the logger itself.
    pub extra: Map<String, Value>,
}

impl LoggerOptions {
    /// Constructor defaults on top of the ambient environment name.
    pub fn defaults(ambient_environment: &str) -> Self {
        Self {
            show_timestamp: true,
            show_caller: true,
            environment: ambient_environment.to_string(),
            exit_on_fatal_error: true,
            suppress_browser_errors: false,
            colorize: true,
            extra: Map::new(),
        }
    }

    /// Hard-coded set used when supplied options cannot be read at all.
    pub fn fallback() -> Self {
        Self::defaults(DEVELOPMENT)
    }

    pub fn is_production(&self) -> bool {
        self.environment == PRODUCTION
    }
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self::fallback()
    }
}

/// Options as supplied by a caller; unset fields take the constructor default.
///
/// Deserializes from camelCase JSON. `env` and `exitOnError` are accepted as
/// aliases, and unknown keys are collected into `extra`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialOptions {
    pub show_timestamp: Option<bool>,
    pub show_caller: Option<bool>,
    #[serde(alias = "env")]
    pub environment: Option<String>,
    #[serde(alias = "exitOnError")]
    pub exit_on_fatal_error: Option<bool>,
    pub suppress_browser_errors: Option<bool>,
    pub colorize: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PartialOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(value: Value) -> Result<Self, OptionsError> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Object(_) => Ok(serde_json::from_value(value)?),
            other => Err(OptionsError::Invalid(format!(
                "expected an object, got {other}"
            ))),
        }
    }

    pub fn with_timestamp(mut self, show: bool) -> Self {
        self.show_timestamp = Some(show);
        self
    }

    pub fn with_caller(mut self, show: bool) -> Self {
        self.show_caller = Some(show);
        self
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    pub fn with_exit_on_fatal_error(mut self, exit: bool) -> Self {
        self.exit_on_fatal_error = Some(exit);
        self
    }

    pub fn with_suppress_browser_errors(mut self, suppress: bool) -> Self {
        self.suppress_browser_errors = Some(suppress);
        self
    }

    pub fn with_colorize(mut self, colorize: bool) -> Self {
        self.colorize = Some(colorize);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Explicit value > constructor default > ambient environment.
    /// An empty environment name counts as unset.
    pub fn resolve(self, ambient_environment: &str) -> LoggerOptions {
        let defaults = LoggerOptions::defaults(ambient_environment);
        let environment = self
            .environment
            .filter(|env| !env.trim().is_empty())
            .unwrap_or(defaults.environment);

        let mut extra = defaults.extra;
        extra.extend(self.extra);

        LoggerOptions {
            show_timestamp: self.show_timestamp.unwrap_or(defaults.show_timestamp),
            show_caller: self.show_caller.unwrap_or(defaults.show_caller),
            environment,
            exit_on_fatal_error: self
                .exit_on_fatal_error
                .unwrap_or(defaults.exit_on_fatal_error),
            suppress_browser_errors: self
                .suppress_browser_errors
                .unwrap_or(defaults.suppress_browser_errors),
            colorize: self.colorize.unwrap_or(defaults.colorize),
            extra,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let options = PartialOptions::new().resolve("staging");
        assert!(options.show_timestamp);
        assert!(options.show_caller);
        assert!(options.exit_on_fatal_error);
        assert!(!options.suppress_browser_errors);
        assert_eq!(options.environment, "staging");
    }

    #[test]
    fn test_explicit_values_win() {
        let options = PartialOptions::new()
            .with_timestamp(false)
            .with_environment(PRODUCTION)
            .with_exit_on_fatal_error(false)
            .resolve(DEVELOPMENT);
        assert!(!options.show_timestamp);
        assert!(options.is_production());
        assert!(!options.exit_on_fatal_error);
    }

    #[test]
    fn test_empty_environment_uses_ambient() {
        let options = PartialOptions::new().with_environment("").resolve("test");
        assert_eq!(options.environment, "test");
    }

    #[test]
    fn test_from_json_with_aliases_and_extra() {
        let partial = PartialOptions::from_json(json!({
            "showCaller": false,
            "env": "production",
            "exitOnError": false,
            "service": "billing"
        }))
        .unwrap();
        assert_eq!(partial.show_caller, Some(false));
        assert_eq!(partial.environment.as_deref(), Some("production"));
        assert_eq!(partial.exit_on_fatal_error, Some(false));
        assert_eq!(partial.extra.get("service"), Some(&json!("billing")));

        let options = partial.resolve(DEVELOPMENT);
        assert_eq!(options.extra.get("service"), Some(&json!("billing")));
    }

    #[test]
    fn test_from_json_null_is_empty() {
        assert_eq!(PartialOptions::from_json(Value::Null).unwrap(), PartialOptions::new());
    }

    #[test]
    fn test_from_json_rejects_bad_types() {
        assert!(PartialOptions::from_json(json!({ "showTimestamp": "yes" })).is_err());
        assert!(PartialOptions::from_json(json!([1, 2])).is_err());
    }
}
