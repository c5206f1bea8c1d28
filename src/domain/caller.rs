use crate::errors::BacktraceError;
use once_cell::sync::Lazy;
use regex::Regex;

pub const UNKNOWN_CALLER: &str = "unknown";
pub const CALLER_UNAVAILABLE: &str = "unknown (error retrieving caller)";
pub const STACK_UNAVAILABLE: &str = "Stack unavailable";

/// Frames above this index belong to the capture call and the logger method.
const FULL_STACK_SKIP: usize = 2;

static PAREN_LOCATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(([^()]*):(\d+):(\d+)\)").expect("static regex"));
static AT_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*at\s+(.*)$").expect("static regex"));
static STD_FRAME_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\d+:\s+(.*)$").expect("static regex"));

/// Symbol prefixes of frames that belong to the backtrace machinery itself.
const CAPTURE_FRAMES: &[&str] = &["std::backtrace", "backtrace_rs", "backtrace::"];

/// Symbol prefixes of frames that belong to the panic runtime.
const RUNTIME_FRAMES: &[&str] = &[
    "std::",
    "core::",
    "alloc::",
    "rust_begin_unwind",
    "__rust",
    "loglight::adapters::",
];

/// An ordered list of frame descriptors, innermost first.
///
/// Frames are stored as `at <symbol> (<path>:<line>:<col>)`, or
/// `at <symbol>` when the location is unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Backtrace {
    frames: Vec<String>,
}

impl Backtrace {
    pub fn from_frames(frames: Vec<String>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Parses the `Display` output of `std::backtrace::Backtrace`.
    pub fn parse_std(text: &str) -> Self {
        let mut frames: Vec<(String, Option<String>)> = Vec::new();
        for line in text.lines() {
            if let Some(header) = STD_FRAME_HEADER.captures(line) {
                frames.push((header[1].trim().to_string(), None));
            } else if let Some(location) = AT_MARKER.captures(line) {
                if let Some((_, slot)) = frames.last_mut() {
                    if slot.is_none() {
                        *slot = Some(location[1].trim().to_string());
                    }
                }
            }
        }
        let frames = frames
            .into_iter()
            .map(|(symbol, location)| match location {
                Some(location) => format!("at {symbol} ({location})"),
                None => format!("at {symbol}"),
            })
            .collect();
        Self { frames }
    }

    /// Drops the leading frames produced by the capture machinery, so index 0
    /// is the function that asked for the backtrace.
    pub fn without_capture_frames(self) -> Self {
        self.without_leading(CAPTURE_FRAMES)
    }

    /// Drops the leading panic-runtime frames, so index 0 is the code that panicked.
    pub fn without_runtime_frames(self) -> Self {
        self.without_leading(RUNTIME_FRAMES)
    }

    /// Drops leading frames whose symbol starts with any of `prefixes`.
    ///
    /// Trait-impl symbols such as `<Foo as Bar>::baz` match on `Foo`.
    pub fn without_leading(self, prefixes: &[&str]) -> Self {
        let frames = self
            .frames
            .into_iter()
            .skip_while(|frame| {
                let symbol = frame.strip_prefix("at ").unwrap_or(frame);
                let symbol = symbol.trim_start_matches('<');
                prefixes.iter().any(|prefix| symbol.starts_with(prefix))
            })
            .collect();
        Self { frames }
    }

    pub fn to_text(&self) -> String {
        self.frames.join("\n")
    }
}

/// Extracts `path:line:col` from the frame at `frame_offset`.
///
/// Tries a `(path:line:col)` group first, then whatever follows a leading
/// `at ` marker. Anything else, including an out-of-range offset, is `"unknown"`.
pub fn resolve_caller(backtrace: &[String], frame_offset: usize) -> String {
    let Some(frame) = backtrace.get(frame_offset) else {
        return UNKNOWN_CALLER.to_string();
    };

    if let Some(location) = PAREN_LOCATION.captures(frame) {
        return format!("{}:{}:{}", location[1].trim(), &location[2], &location[3]);
    }

    if let Some(rest) = AT_MARKER.captures(frame) {
        let rest = rest[1].trim();
        if !rest.is_empty() {
            return rest.to_string();
        }
    }

    UNKNOWN_CALLER.to_string()
}

pub fn try_resolve_caller(
    capture: Result<Backtrace, BacktraceError>,
    frame_offset: usize,
) -> String {
    match capture {
        Ok(backtrace) => resolve_caller(backtrace.frames(), frame_offset),
        Err(_) => CALLER_UNAVAILABLE.to_string(),
    }
}

/// Every frame from index 2 onward, newline-joined.
pub fn resolve_full_backtrace(backtrace: &[String]) -> String {
    if backtrace.len() <= FULL_STACK_SKIP {
        return STACK_UNAVAILABLE.to_string();
    }
    backtrace[FULL_STACK_SKIP..].join("\n")
}

pub fn try_resolve_full_backtrace(capture: Result<Backtrace, BacktraceError>) -> String {
    match capture {
        Ok(backtrace) => resolve_full_backtrace(backtrace.frames()),
        Err(_) => STACK_UNAVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|line| line.to_string()).collect()
    }

    const STD_OUTPUT: &str = "   0: std::backtrace_rs::backtrace::libunwind::trace
             at /rustc/abc/library/std/src/../../backtrace/src/backtrace/libunwind.rs:116:5
   1: std::backtrace::Backtrace::create
             at /rustc/abc/library/std/src/backtrace.rs:331:13
   2: loglight::adapters::native::backtrace::capture_backtrace
             at ./src/adapters/native/backtrace.rs:9:21
   3: loglight::logger::Logger::get_full_stack
             at ./src/logger.rs:200:9
   4: demo::main
             at ./demo/src/main.rs:12:5
   5: __libc_start_main";

    #[test]
    fn test_empty_backtrace_is_unknown() {
        assert_eq!(resolve_caller(&[], 0), "unknown");
        assert_eq!(resolve_caller(&[], 7), "unknown");
    }

    #[test]
    fn test_at_marker_fallback() {
        let trace = frames(&["...", "...", "  at foo.js:10:2"]);
        assert_eq!(resolve_caller(&trace, 2), "foo.js:10:2");
    }

    #[test]
    fn test_paren_location_preferred() {
        let trace = frames(&["at demo::main (./demo/src/main.rs:12:5)"]);
        assert_eq!(resolve_caller(&trace, 0), "./demo/src/main.rs:12:5");
    }

    #[test]
    fn test_unmatched_frame_is_unknown() {
        let trace = frames(&["<anonymous>"]);
        assert_eq!(resolve_caller(&trace, 0), "unknown");
        assert_eq!(resolve_caller(&trace, 1), "unknown");
    }

    #[test]
    fn test_failed_capture() {
        assert_eq!(
            try_resolve_caller(Err(BacktraceError::Unsupported), 0),
            "unknown (error retrieving caller)"
        );
        assert_eq!(
            try_resolve_full_backtrace(Err(BacktraceError::Disabled)),
            "Stack unavailable"
        );
    }

    #[test]
    fn test_full_backtrace_skips_two_frames() {
        let trace = frames(&["capture", "logger", "at a (a.rs:1:1)", "at b (b.rs:2:2)"]);
        assert_eq!(resolve_full_backtrace(&trace), "at a (a.rs:1:1)\nat b (b.rs:2:2)");
        assert_eq!(resolve_full_backtrace(&[]), "Stack unavailable");
        assert_eq!(resolve_full_backtrace(&frames(&["a", "b"])), "Stack unavailable");
    }

    #[test]
    fn test_parse_std_output() {
        let trace = Backtrace::parse_std(STD_OUTPUT);
        assert_eq!(trace.frames().len(), 6);
        assert_eq!(
            trace.frames()[4],
            "at demo::main (./demo/src/main.rs:12:5)"
        );
        assert_eq!(trace.frames()[5], "at __libc_start_main");
    }

    #[test]
    fn test_capture_frames_are_stripped() {
        let trace = Backtrace::parse_std(STD_OUTPUT).without_capture_frames();
        assert!(trace.frames()[0].contains("capture_backtrace"));
        assert_eq!(resolve_caller(trace.frames(), 2), "./demo/src/main.rs:12:5");
        assert!(resolve_full_backtrace(trace.frames()).starts_with("at demo::main"));
    }

    #[test]
    fn test_runtime_frames_are_stripped() {
        let trace = Backtrace::parse_std(STD_OUTPUT).without_runtime_frames();
        assert!(trace.frames()[0].starts_with("at loglight::logger"));
    }

    const PANIC_OUTPUT: &str = "   0: std::backtrace_rs::backtrace::libunwind::trace
   1: std::backtrace::Backtrace::force_capture
   2: loglight::adapters::native::backtrace::capture_backtrace
             at ./src/adapters/native/backtrace.rs:10:20
   3: loglight::adapters::native::host::throwable_from_panic
             at ./src/adapters/native/host.rs:96:17
   4: <loglight::adapters::native::host::Host as loglight::ports::host::HostPort>::install::{{closure}}
             at ./src/adapters/native/host.rs:52:30
   5: <alloc::boxed::Box<F,A> as core::ops::function::Fn<Args>>::call
             at /rustc/abc/library/alloc/src/boxed.rs:1985:9
   6: std::panicking::rust_panic_with_hook
             at /rustc/abc/library/std/src/panicking.rs:841:13
   7: __rustc::rust_begin_unwind
             at /rustc/abc/library/std/src/panicking.rs:697:5
   8: core::panicking::panic_fmt
             at /rustc/abc/library/core/src/panicking.rs:75:14
   9: billing::invoice::total
             at ./src/invoice.rs:31:9
  10: billing::main
             at ./src/main.rs:7:5";

    #[test]
    fn test_trait_impl_runtime_frames_are_stripped() {
        let trace = Backtrace::parse_std(PANIC_OUTPUT)
            .without_capture_frames()
            .without_runtime_frames();
        assert_eq!(
            trace.frames()[0],
            "at billing::invoice::total (./src/invoice.rs:31:9)"
        );
        assert_eq!(resolve_caller(trace.frames(), 0), "./src/invoice.rs:31:9");
        assert_eq!(trace.frames().len(), 2);
    }

    #[test]
    fn test_without_leading_keeps_later_matches() {
        let trace = Backtrace::from_frames(frames(&[
            "at <app::Repo as app::Store>::load (./src/repo.rs:4:1)",
            "at app::main (./src/main.rs:2:1)",
            "at app::helper (./src/main.rs:9:1)",
        ]))
        .without_leading(&["app::Repo", "app::helper"]);
        assert_eq!(trace.frames().len(), 2);
        assert!(trace.frames()[0].starts_with("at app::main"));
    }
}
