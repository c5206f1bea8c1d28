#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use loglight::adapters::{FixedClock, MemorySink, RecordingHost};
use loglight::{ErrorMonitor, Logger, ModuleHost, PartialOptions, Platform, RuntimeEnvironment};
use std::sync::Arc;

pub fn fixed_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 17, 8, 30, 0).unwrap()
}

/// An isolated monitor with its own recording host and console.
pub struct Harness {
    pub host: Arc<RecordingHost>,
    pub monitor: Arc<ErrorMonitor>,
    pub sink: Arc<MemorySink>,
}

impl Harness {
    pub fn new() -> Self {
        let host = Arc::new(RecordingHost::new());
        Self {
            monitor: ErrorMonitor::new(host.clone()),
            host,
            sink: Arc::new(MemorySink::new()),
        }
    }

    pub fn platform(&self, host: ModuleHost, environment: &str) -> Platform {
        Platform::new()
            .with_sink(self.sink.clone())
            .with_clock(Arc::new(FixedClock::new(fixed_instant())))
            .with_environment(RuntimeEnvironment::new(host, environment))
    }

    /// Terminal logger without colors.
    pub fn logger(&self, name: &str, options: PartialOptions) -> Logger {
        Logger::builder()
            .name(name)
            .options(options.with_colorize(false))
            .platform(self.platform(ModuleHost::Synchronous, "development"))
            .monitor(self.monitor.clone())
            .build()
    }

    pub fn browser_logger(&self, name: &str, options: PartialOptions) -> Logger {
        Logger::builder()
            .name(name)
            .options(options)
            .platform(self.platform(ModuleHost::Browser, "development"))
            .monitor(self.monitor.clone())
            .build()
    }
}

pub fn quiet() -> PartialOptions {
    PartialOptions::new().with_timestamp(false).with_caller(false)
}
