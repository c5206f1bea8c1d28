use std::fmt;

pub const RESET: &str = "\x1b[0m";

/// Severity of a record. The set is closed: names outside it are rendered
/// with the `Info` style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Info,
    Debug,
    Warning,
    Error,
    Critical,
}

impl Level {
    pub const ALL: [Level; 5] = [
        Level::Info,
        Level::Debug,
        Level::Warning,
        Level::Error,
        Level::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        }
    }

    /// ANSI escape opening this level's color.
    pub fn ansi_style(&self) -> &'static str {
        match self {
            Level::Info => "\x1b[34m",
            Level::Debug => "\x1b[36m",
            Level::Warning => "\x1b[33m",
            Level::Error => "\x1b[31m",
            Level::Critical => "\x1b[41m\x1b[37m",
        }
    }

    /// Case-insensitive lookup by display name.
    pub fn from_name(name: &str) -> Option<Level> {
        Level::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(name.trim()))
    }

    pub fn style_for(name: &str) -> Level {
        Level::from_name(name).unwrap_or(Level::Info)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_styles_are_distinct() {
        for (i, a) in Level::ALL.iter().enumerate() {
            for b in &Level::ALL[i + 1..] {
                assert_ne!(a.ansi_style(), b.ansi_style(), "{a} and {b} share a style");
            }
        }
    }

    #[test]
    fn test_from_name_is_case_insensitive() {
        assert_eq!(Level::from_name("warning"), Some(Level::Warning));
        assert_eq!(Level::from_name(" Critical "), Some(Level::Critical));
        assert_eq!(Level::from_name("trace"), None);
    }

    #[test]
    fn test_unknown_level_uses_info_style() {
        assert_eq!(Level::style_for("NOTICE"), Level::Info);
        assert_eq!(Level::style_for("debug"), Level::Debug);
    }
}
