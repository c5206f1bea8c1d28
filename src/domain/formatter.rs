use super::level::{Level, RESET};
use super::metadata::Metadata;
use super::options::LoggerOptions;
use crate::errors::LogError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

pub const DEBUG_SUPPRESSED: &str = "Debug suppressed in production";

/// Deepest metadata nesting rendered into a `Meta:` block.
pub const MAX_META_DEPTH: usize = 128;

/// Everything needed to render one log call.
#[derive(Debug, Clone)]
pub struct LogRecord<'a> {
    pub name: &'a str,
    /// Upper-cased label as displayed; usually `level.as_str()`.
    pub label: &'a str,
    pub level: Level,
    pub message: &'a str,
    pub meta: Option<&'a Metadata>,
    pub timestamp: DateTime<Utc>,
    pub caller: Option<&'a str>,
}

/// Output shape handed to the console sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedOutput {
    /// Terminal output: one entry per block.
    Lines(Vec<String>),
    /// Browser output: a collapsed group keyed by the prefix.
    Group { label: String, body: Vec<String> },
}

impl RenderedOutput {
    pub fn to_text(&self) -> String {
        match self {
            RenderedOutput::Lines(lines) => lines.join("\n"),
            RenderedOutput::Group { label, body } => {
                let mut text = label.clone();
                for line in body {
                    text.push('\n');
                    text.push_str(line);
                }
                text
            }
        }
    }
}

pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelFormatter {
    browser_like: bool,
}

impl LevelFormatter {
    pub fn new(browser_like: bool) -> Self {
        Self { browser_like }
    }

    pub fn is_browser_like(&self) -> bool {
        self.browser_like
    }

    /// DEBUG records produce nothing at all in production.
    pub fn is_suppressed(level: Level, options: &LoggerOptions) -> bool {
        level == Level::Debug && options.is_production()
    }

    /// Renders `record`, or `Ok(None)` when the record is gated out.
    pub fn format(
        &self,
        record: &LogRecord<'_>,
        options: &LoggerOptions,
    ) -> Result<Option<RenderedOutput>, LogError> {
        if Self::is_suppressed(record.level, options) {
            return Ok(None);
        }

        let stack = record.meta.and_then(Metadata::stack);
        let meta_block = match record.meta {
            Some(meta) if meta.has_fields() => {
                let fields = meta.fields();
                if exceeds_depth(&fields, MAX_META_DEPTH) {
                    return Err(LogError::TooDeep(MAX_META_DEPTH));
                }
                Some(format!("Meta: {}", serde_json::to_string_pretty(&fields)?))
            }
            _ => None,
        };

        if self.browser_like {
            let mut body = vec![record.message.to_string()];
            body.extend(stack.map(str::to_string));
            body.extend(meta_block);
            return Ok(Some(RenderedOutput::Group {
                label: format!("[{}] [{}]", record.name, record.label),
                body,
            }));
        }

        let (open, close) = if options.colorize {
            (record.level.ansi_style(), RESET)
        } else {
            ("", "")
        };

        let mut lines = vec![format!(
            "{open}{}{close} {}",
            self.terminal_prefix(record, options),
            record.message
        )];
        if let Some(stack) = stack {
            lines.push(format!("{open}{stack}{close}"));
        }
        if let Some(block) = meta_block {
            lines.push(format!("{open}{block}{close}"));
        }
        Ok(Some(RenderedOutput::Lines(lines)))
    }

    /// Rendered text without writing it anywhere.
    pub fn render_preview(
        &self,
        record: &LogRecord<'_>,
        options: &LoggerOptions,
    ) -> Result<String, LogError> {
        Ok(self
            .format(record, options)?
            .map(|output| output.to_text())
            .unwrap_or_else(|| DEBUG_SUPPRESSED.to_string()))
    }

    fn terminal_prefix(&self, record: &LogRecord<'_>, options: &LoggerOptions) -> String {
        let mut prefix = String::new();
        if options.show_timestamp {
            prefix.push_str(&format!("[{}] ", format_timestamp(record.timestamp)));
        }
        prefix.push_str(&format!("[{}] [{}]", record.name, record.label));
        if options.show_caller {
            prefix.push_str(&format!(" [{}]", record.caller.unwrap_or("unknown")));
        }
        prefix
    }
}

fn exceeds_depth(fields: &Map<String, Value>, limit: usize) -> bool {
    fn walk(value: &Value, remaining: usize) -> bool {
        match value {
            Value::Object(map) => remaining == 0 || map.values().any(|v| walk(v, remaining - 1)),
            Value::Array(items) => remaining == 0 || items.iter().any(|v| walk(v, remaining - 1)),
            _ => false,
        }
    }
    fields.values().any(|value| walk(value, limit))
}
