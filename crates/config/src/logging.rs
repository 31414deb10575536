//! Logging bootstrap for tools that embed the configuration loader

use serde::{Deserialize, Serialize};
use toolchain_types::{ConfigError, Result};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const VALID_LOG_FORMATS: [&str; 2] = ["json", "pretty"];

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level, overridden by `RUST_LOG` when set
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<()> {
        if !VALID_LOG_LEVELS.contains(&self.level.as_str()) {
            return Err(ConfigError::malformed(
                "logging.level",
                format!(
                    "Invalid log level: {}. Valid levels: {:?}",
                    self.level, VALID_LOG_LEVELS
                ),
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.as_str()) {
            return Err(ConfigError::malformed(
                "logging.format",
                format!(
                    "Invalid log format: {}. Valid formats: {:?}",
                    self.format, VALID_LOG_FORMATS
                ),
            ));
        }

        Ok(())
    }
}

/// Install the global tracing subscriber
///
/// Returns `Ok(false)` when a subscriber was already installed by the host
/// process; that one is left in place.
pub fn init_logging(config: &LoggingConfig) -> Result<bool> {
    config.validate()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = match config.format.as_str() {
        "pretty" => registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init(),
        _ => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
    };

    if let Err(e) = installed {
        debug!("Tracing subscriber already installed: {}", e);
        return Ok(false);
    }

    info!(level = %config.level, format = %config.format, "Logging initialized");
    if config.level == "trace" || config.level == "debug" {
        warn!("Debug/trace logging enabled - output may be noisy");
    }

    Ok(true)
}
