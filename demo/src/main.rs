use loglight::{init_log_bridge, Logger, Metadata, PartialOptions, RuntimeEnvironment};
use serde_json::json;
use std::fmt;

mod config;

use config::CONFIG;

#[derive(Debug)]
struct QuotaExceeded {
    used: u64,
    limit: u64,
}

impl fmt::Display for QuotaExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "quota exceeded: {}/{}", self.used, self.limit)
    }
}

impl std::error::Error for QuotaExceeded {}

fn main() {
    dotenv::dotenv().ok();

    let env = RuntimeEnvironment::current();
    let app = Logger::with_json_options(CONFIG.logger_name.as_str(), CONFIG.logger_options.clone());
    app.info_with(
        "starting",
        json!({ "host": env.describe(), "environment": app.options().environment }),
    );
    app.debug("debug output is dropped in production");

    let http = Logger::new(
        "http",
        PartialOptions::new().with_caller(false).with_exit_on_fatal_error(false),
    );
    http.warning_with(
        "slow request",
        Metadata::new().with("route", "/api/items").with("ms", 1840),
    );

    let err = QuotaExceeded { used: 120, limit: 100 };
    http.error_with("upload rejected", &err);
    http.critical("storage unavailable");
    println!("{}", http.simulate_log("info", "preview only", None));

    if let Err(err) = init_log_bridge(app.clone(), log::LevelFilter::Debug) {
        app.warning(format!("log bridge not installed: {err}"));
    }
    log::info!(target: "deps", "records from the log facade share the format");

    http.destroy();

    if CONFIG.panic_demo {
        // Reported by every registered logger; the runtime then ends the process.
        panic!("demo panic");
    }
    app.info("done");
}
