use crate::ports::clock::ClockPort;
use chrono::{DateTime, Utc};

/// Clock frozen at a single instant, for deterministic output.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    instant: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self { instant }
    }
}

impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant
    }
}
