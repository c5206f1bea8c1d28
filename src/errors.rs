use std::fmt;

/// Failure while rendering a record. Never escapes the logger: it is turned
/// into a fallback line by `Logger::log`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogError {
    Serialization(String),
    /// Metadata nests deeper than the formatter walks.
    TooDeep(usize),
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogError::Serialization(msg) => write!(f, "Serialization Error: {msg}"),
            LogError::TooDeep(limit) => write!(f, "Metadata nested deeper than {limit} levels"),
        }
    }
}

impl std::error::Error for LogError {}

impl From<serde_json::Error> for LogError {
    fn from(err: serde_json::Error) -> Self {
        LogError::Serialization(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BacktraceError {
    /// The host cannot walk its own stack (e.g. `wasm32-unknown-unknown`).
    Unsupported,
    Disabled,
}

impl fmt::Display for BacktraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BacktraceError::Unsupported => write!(f, "Backtraces are not supported on this host"),
            BacktraceError::Disabled => write!(f, "Backtrace capture is disabled"),
        }
    }
}

impl std::error::Error for BacktraceError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorError {
    InstallFailed(String),
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorError::InstallFailed(msg) => write!(f, "Handler installation failed: {msg}"),
        }
    }
}

impl std::error::Error for MonitorError {}

impl MonitorError {
    pub fn install_failed(message: impl Into<String>) -> Self {
        MonitorError::InstallFailed(message.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionsError {
    Invalid(String),
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionsError::Invalid(msg) => write!(f, "Invalid logger options: {msg}"),
        }
    }
}

impl std::error::Error for OptionsError {}

impl From<serde_json::Error> for OptionsError {
    fn from(err: serde_json::Error) -> Self {
        OptionsError::Invalid(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            LogError::Serialization("bad".into()).to_string(),
            "Serialization Error: bad"
        );
        assert_eq!(
            LogError::TooDeep(128).to_string(),
            "Metadata nested deeper than 128 levels"
        );
        assert_eq!(
            MonitorError::install_failed("busy").to_string(),
            "Handler installation failed: busy"
        );
        assert!(BacktraceError::Unsupported.to_string().contains("not supported"));
    }

    #[test]
    fn test_options_error_from_serde() {
        let err = serde_json::from_str::<bool>("\"yes\"").unwrap_err();
        let options_err: OptionsError = err.into();
        assert!(options_err.to_string().starts_with("Invalid logger options"));
    }
}
