use crate::ports::ConsoleSinkPort;
use std::io::{self, Write};

/// Native sink: records go to stdout, warnings about the logger to stderr.
///
/// Write errors (closed pipe, full disk) are ignored so that logging can
/// never take the process down.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }
}

impl ConsoleSinkPort for ConsoleSink {
    fn line(&self, line: &str) {
        let _ = writeln!(io::stdout().lock(), "{line}");
    }

    fn warn(&self, message: &str) {
        let _ = writeln!(io::stderr().lock(), "{message}");
    }

    fn group(&self, label: &str, body: &[String]) {
        let mut out = io::stdout().lock();
        let _ = writeln!(out, "{label}");
        for line in body {
            for row in line.lines() {
                let _ = writeln!(out, "  {row}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_all_methods() {
        let sink = ConsoleSink::new();
        sink.line("test line");
        sink.warn("test warn");
        sink.group("[test] [INFO]", &["body".to_string(), "a\nb".to_string()]);
    }
}
