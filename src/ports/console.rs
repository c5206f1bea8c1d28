/// Console sink port - the destination that renders formatted log output.
///
/// Implementations:
/// - WASM: Console API (console.log, console.warn, console.groupCollapsed)
/// - Native: stdout / stderr
/// - Tests: in-memory recording
///
/// A sink must never panic back into the logger; write failures are dropped.
pub trait ConsoleSinkPort: Send + Sync {
    /// Write a single flat line.
    fn line(&self, line: &str);

    /// Write a non-fatal warning about the logger itself.
    fn warn(&self, message: &str);

    /// Write a collapsible group: a label followed by its body lines.
    fn group(&self, label: &str, body: &[String]);
}
