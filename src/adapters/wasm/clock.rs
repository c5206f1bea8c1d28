use crate::ports::clock::ClockPort;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, Default)]
pub struct Clock;

impl Clock {
    pub fn new() -> Self {
        Self
    }
}

impl ClockPort for Clock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default()
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_clock_now_is_recent() {
        let timestamp = Clock::new().now().timestamp();
        assert!(
            timestamp > 1_577_836_800,
            "Timestamp should be after 2020: {}",
            timestamp
        );
    }
}
