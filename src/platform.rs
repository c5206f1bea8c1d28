/// Platform - Dependency injection container for the ports a logger writes through.
///
/// Hybrid approach:
/// - Default adapters: process-wide instances shared by every logger
/// - Injected adapters: any `Arc<dyn Trait>` (test sinks, fixed clocks)

use crate::domain::RuntimeEnvironment;
use crate::ports::{ClockPort, ConsoleSinkPort};
use std::fmt;
use std::sync::Arc;

#[derive(Clone)]
pub struct Platform {
    sink: Arc<dyn ConsoleSinkPort>,
    clock: Arc<dyn ClockPort>,
    environment: RuntimeEnvironment,
}

impl Platform {
    /// Creates a new Platform with default adapters for the current target.
    pub fn new() -> Self {
        Self {
            sink: crate::adapters::console(),
            clock: crate::adapters::clock(),
            environment: RuntimeEnvironment::current().clone(),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn ConsoleSinkPort>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn ClockPort>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_environment(mut self, environment: RuntimeEnvironment) -> Self {
        self.environment = environment;
        self
    }

    #[inline]
    pub fn sink(&self) -> &dyn ConsoleSinkPort {
        self.sink.as_ref()
    }

    #[inline]
    pub fn clock(&self) -> &dyn ClockPort {
        self.clock.as_ref()
    }

    #[inline]
    pub fn environment(&self) -> &RuntimeEnvironment {
        &self.environment
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Platform")
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}
