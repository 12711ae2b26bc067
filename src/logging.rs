//! Tracing setup for the runner binary
//!
//! Logs go to stderr so `--json` output on stdout stays machine-readable.
//! `RUST_LOG` overrides the configured filter when set.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub default_level: LogLevel,
    pub module_filters: Vec<(String, LogLevel)>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: LogLevel::Warn,
            module_filters: vec![
                ("hexmatch_core::session".to_string(), LogLevel::Info),
                ("hexmatch_core::resolver".to_string(), LogLevel::Warn),
            ],
        }
    }
}

impl TracingConfig {
    pub fn to_env_filter_string(&self) -> String {
        let mut parts = vec![self.default_level.as_str().to_string()];
        for (module, level) in &self.module_filters {
            parts.push(format!("{}={}", module, level.as_str()));
        }
        parts.join(",")
    }
}

static TRACING_INIT: Once = Once::new();

pub fn init_tracing_default() {
    init_tracing(&TracingConfig::default());
}

/// First call wins; later calls are no-ops
pub fn init_tracing(config: &TracingConfig) {
    let filter_str = config.to_env_filter_string();
    TRACING_INIT.call_once(move || {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .compact();

        // A test harness may already have installed a subscriber.
        let _ = subscriber.try_init();
    });
}
