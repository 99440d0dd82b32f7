pub static BIND_ADDRESS_ENV_VAR: &str = "PLUGIN_BIND_ADDRESS";
pub static SHUTDOWN_TIMEOUT_ENV_VAR: &str = "PLUGIN_SHUTDOWN_TIMEOUT";
pub static WORKERS_ENV_VAR: &str = "PLUGIN_WORKERS";
pub static LOG_FORMAT_ENV_VAR: &str = "LOG_FORMAT";

pub static DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
pub const DEFAULT_SHUTDOWN_TIMEOUT: u64 = 5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "compact" | "text" => Some(LogFormat::Compact),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub bind_address: String,
    /// Seconds workers get to finish in-flight calls on shutdown
    pub shutdown_timeout: u64,
    /// Worker count, defaults to the number of physical cores
    pub workers: Option<usize>,
    pub log_format: LogFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
            workers: None,
            log_format: LogFormat::default(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary variable source. Values that fail to
    /// parse fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            bind_address: lookup(BIND_ADDRESS_ENV_VAR).unwrap_or(defaults.bind_address),
            shutdown_timeout: lookup(SHUTDOWN_TIMEOUT_ENV_VAR)
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.shutdown_timeout),
            workers: lookup(WORKERS_ENV_VAR)
                .and_then(|v| v.parse().ok())
                .filter(|workers| *workers > 0),
            log_format: lookup(LOG_FORMAT_ENV_VAR)
                .and_then(|v| LogFormat::parse(&v))
                .unwrap_or(defaults.log_format),
        }
    }
}
