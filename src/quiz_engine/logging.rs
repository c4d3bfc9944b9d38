//! Logging System
//!
//! Structured logging through `tracing`. The library itself only emits events;
//! applications call [`init_logging`] once at startup to install a subscriber.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::quiz_engine::error::LoggingError;

/// Environment variable that overrides the configured filter.
pub const LOG_ENV_VAR: &str = "QUIZGEN_LOG";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: text or json
    #[serde(default = "default_format")]
    pub format: String,

    /// Colored output (text format only)
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_format(),
            color: default_true(),
        }
    }
}

fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    let directive = std::env::var(LOG_ENV_VAR).unwrap_or_else(|_| config.level.clone());
    EnvFilter::try_new(&directive).map_err(|_| LoggingError::InvalidFilter(directive))
}

/// Install the global subscriber.
///
/// Priority: `QUIZGEN_LOG`, then `config.level`. Fails if a subscriber is
/// already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = build_env_filter(config)?;
    let registry = Registry::default().with(filter);

    let installed = match config.format.as_str() {
        "json" => registry
            .with(fmt::layer().json().with_target(true))
            .try_init(),
        "text" => registry
            .with(fmt::layer().with_ansi(config.color).with_target(true))
            .try_init(),
        other => return Err(LoggingError::UnknownFormat(other.to_string())),
    };

    installed.map_err(|_| LoggingError::AlreadyInitialized)
}
