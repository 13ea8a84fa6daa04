//! Validation of configuration values against the file system.

use crate::schema::{Config, ConfigResult};
use tracing::warn;
use tscat_common::TscatError;

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the configuration structure.
    pub fn validate(config: &Config) -> ConfigResult<()> {
        config.validate()
    }

    /// Validates the configuration and checks that the translations
    /// directory, when present, is a directory.
    ///
    /// A missing directory only warns: the application then shows
    /// untranslated text.
    pub fn validate_environment(config: &Config) -> ConfigResult<()> {
        Self::validate(config)?;

        let dir = &config.i18n.translations_dir;
        match std::fs::metadata(dir) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(TscatError::Config(format!(
                "Translations path {} is not a directory",
                dir.display()
            ))),
            Err(e) => {
                warn!("Translations directory {} unavailable: {}", dir.display(), e);
                Ok(())
            }
        }
    }
}
