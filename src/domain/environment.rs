use super::options::DEVELOPMENT;
use once_cell::sync::Lazy;

/// Environment variables naming the ambient environment, in lookup order.
pub const ENVIRONMENT_VARS: [&str; 2] = ["APP_ENV", "NODE_ENV"];

static CURRENT: Lazy<RuntimeEnvironment> = Lazy::new(RuntimeEnvironment::probe);

/// Which kind of host the crate is running in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleHost {
    /// A page with a `window` and a `document`.
    Browser,
    /// A native process.
    Synchronous,
    /// A wasm host without a document: workers and JS runtimes.
    Asynchronous,
}

/// Snapshot of the runtime, taken once and shared by every logger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeEnvironment {
    host: ModuleHost,
    default_environment: String,
}

impl RuntimeEnvironment {
    pub fn new(host: ModuleHost, default_environment: impl Into<String>) -> Self {
        Self {
            host,
            default_environment: default_environment.into(),
        }
    }

    /// Probes the host and the environment variables. Never panics; signals
    /// that cannot be read count as absent.
    pub fn probe() -> Self {
        Self::new(
            crate::adapters::probe_module_host(),
            ambient_environment(|key| std::env::var(key).ok()),
        )
    }

    /// The process-wide snapshot.
    pub fn current() -> &'static RuntimeEnvironment {
        &CURRENT
    }

    pub fn host(&self) -> ModuleHost {
        self.host
    }

    pub fn is_browser_like(&self) -> bool {
        self.host == ModuleHost::Browser
    }

    pub fn is_sync_module_host(&self) -> bool {
        self.host == ModuleHost::Synchronous
    }

    pub fn is_async_module_host(&self) -> bool {
        self.host == ModuleHost::Asynchronous
    }

    pub fn default_environment(&self) -> &str {
        &self.default_environment
    }

    pub fn describe(&self) -> &'static str {
        match self.host {
            ModuleHost::Browser => "Browser",
            ModuleHost::Synchronous => "Synchronous",
            ModuleHost::Asynchronous => "Asynchronous",
        }
    }
}

/// First non-blank value among `ENVIRONMENT_VARS`, else `"development"`.
pub fn ambient_environment<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    ENVIRONMENT_VARS
        .iter()
        .filter_map(|key| lookup(key))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .unwrap_or_else(|| DEVELOPMENT.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_one_host_flag() {
        for host in [ModuleHost::Browser, ModuleHost::Synchronous, ModuleHost::Asynchronous] {
            let env = RuntimeEnvironment::new(host, DEVELOPMENT);
            let flags = [
                env.is_browser_like(),
                env.is_sync_module_host(),
                env.is_async_module_host(),
            ];
            assert_eq!(flags.iter().filter(|flag| **flag).count(), 1, "{host:?}");
        }
    }

    #[test]
    fn test_ambient_environment_lookup_order() {
        let env = ambient_environment(|key| match key {
            "APP_ENV" => Some("staging".to_string()),
            "NODE_ENV" => Some("production".to_string()),
            _ => None,
        });
        assert_eq!(env, "staging");

        let env = ambient_environment(|key| (key == "NODE_ENV").then(|| "production".to_string()));
        assert_eq!(env, "production");
    }

    #[test]
    fn test_ambient_environment_defaults_to_development() {
        assert_eq!(ambient_environment(|_| None), "development");
        assert_eq!(ambient_environment(|_| Some("  ".to_string())), "development");
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_native_probe_is_synchronous() {
        let env = RuntimeEnvironment::current();
        assert!(env.is_sync_module_host());
        assert!(!env.is_browser_like());
        assert_eq!(env.describe(), "Synchronous");
    }
}
