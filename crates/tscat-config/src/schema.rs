//! Configuration schema definitions using serde.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tscat_common::{DuplicatePolicy, LocaleSetting, TscatError};

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, TscatError>;

/// Main configuration structure for tscat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Translation configuration.
    pub i18n: I18nConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Translation catalog configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct I18nConfig {
    /// Requested display language, or `system`.
    pub locale: LocaleSetting,
    /// Directory holding `<prefix>_<language>.ts` files.
    pub translations_dir: PathBuf,
    /// Resource prefixes, loaded in order; later ones take precedence.
    pub resources: Vec<String>,
    /// Handling of a key that appears twice in one context.
    pub duplicate_keys: DuplicatePolicy,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `tracing-subscriber` filter directive, e.g. `tscat=debug`.
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.i18n.translations_dir.as_os_str().is_empty() {
            return Err(TscatError::Config(
                "Translations directory cannot be empty".to_string(),
            ));
        }

        if self.i18n.resources.is_empty() {
            return Err(TscatError::Config(
                "At least one resource prefix is required".to_string(),
            ));
        }

        for prefix in &self.i18n.resources {
            if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                return Err(TscatError::Config(format!(
                    "Invalid resource prefix '{prefix}': use letters, digits and '-'"
                )));
            }
        }

        if self.logging.filter.trim().is_empty() {
            return Err(TscatError::Config(
                "Logging filter cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
