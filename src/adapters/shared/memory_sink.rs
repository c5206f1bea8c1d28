use crate::ports::ConsoleSinkPort;
use parking_lot::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEntry {
    Line(String),
    Warn(String),
    Group { label: String, body: Vec<String> },
}

/// Sink that keeps every write in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<SinkEntry>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<SinkEntry> {
        self.entries.lock().clone()
    }

    /// Number of console writes, warnings included.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Text of every line and group, in write order. Warnings are excluded.
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .filter_map(|entry| match entry {
                SinkEntry::Line(line) => Some(line.clone()),
                SinkEntry::Group { label, body } => {
                    let mut text = label.clone();
                    for line in body {
                        text.push('\n');
                        text.push_str(line);
                    }
                    Some(text)
                }
                SinkEntry::Warn(_) => None,
            })
            .collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .filter_map(|entry| match entry {
                SinkEntry::Warn(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn text(&self) -> String {
        self.lines().join("\n")
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl ConsoleSinkPort for MemorySink {
    fn line(&self, line: &str) {
        self.entries.lock().push(SinkEntry::Line(line.to_string()));
    }

    fn warn(&self, message: &str) {
        self.entries.lock().push(SinkEntry::Warn(message.to_string()));
    }

    fn group(&self, label: &str, body: &[String]) {
        self.entries.lock().push(SinkEntry::Group {
            label: label.to_string(),
            body: body.to_vec(),
        });
    }
}
