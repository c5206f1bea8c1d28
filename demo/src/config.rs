use once_cell::sync::Lazy;
use std::env;

pub struct Config {
    pub logger_name: String,
    /// camelCase JSON, e.g. `{"showCaller": false}`.
    pub logger_options: serde_json::Value,
    pub panic_demo: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logger_name: env::var("DEMO_LOGGER").unwrap_or_else(|_| "demo".to_string()),
            logger_options: env::var("DEMO_LOGGER_OPTIONS")
                .ok()
                .and_then(|raw| serde_json::from_str(&raw).ok())
                .unwrap_or(serde_json::Value::Null),
            panic_demo: env::var("DEMO_PANIC")
                .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }
}

pub static CONFIG: Lazy<Config> = Lazy::new(Config::default);
