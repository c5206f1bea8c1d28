use crate::domain::Backtrace;
use crate::errors::BacktraceError;
use std::backtrace::{Backtrace as StdBacktrace, BacktraceStatus};

/// Captures the current stack regardless of `RUST_BACKTRACE`.
///
/// Frame 0 of the result is the function that called `capture_backtrace`.
#[inline(never)]
pub fn capture_backtrace() -> Result<Backtrace, BacktraceError> {
    let captured = StdBacktrace::force_capture();
    match captured.status() {
        BacktraceStatus::Captured => {
            Ok(Backtrace::parse_std(&captured.to_string()).without_capture_frames())
        }
        BacktraceStatus::Disabled => Err(BacktraceError::Disabled),
        _ => Err(BacktraceError::Unsupported),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_has_no_machinery_frames() {
        let trace = capture_backtrace().unwrap();
        assert!(!trace.is_empty());
        assert!(!trace.frames()[0].contains("std::backtrace"));
    }
}
