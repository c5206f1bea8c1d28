use chrono::{DateTime, Utc};

/// Port for reading wall-clock time
pub trait ClockPort: Send + Sync {
    /// Returns the current UTC time
    fn now(&self) -> DateTime<Utc>;
}
