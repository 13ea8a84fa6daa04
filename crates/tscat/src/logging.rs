//! Logging initialization.

use crate::error::{AppError, AppResult};
use tscat_config::LoggingConfig;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber.
///
/// `RUST_LOG` takes precedence over the configured filter. Logs go to
/// standard error so that command output on standard output stays clean.
pub fn init_logging(config: &LoggingConfig) -> AppResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.filter)
            .map_err(|e| AppError::Logging(format!("invalid filter '{}': {e}", config.filter)))?,
    };

    let json = config
        .json
        .then(|| fmt::layer().json().with_writer(std::io::stderr));
    let text = (!config.json).then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(text)
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))
}
