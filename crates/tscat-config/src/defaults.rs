//! Default configuration values.

use crate::schema::{I18nConfig, LoggingConfig};
use std::path::PathBuf;
use tscat_common::{DuplicatePolicy, LocaleSetting};

/// Default translations directory, relative to the working directory.
pub const DEFAULT_TRANSLATIONS_DIR: &str = "translations";

/// Default resource prefixes: toolkit strings first, application strings last.
pub const DEFAULT_RESOURCES: [&str; 2] = ["qt", "app"];

/// Default logging filter.
pub const DEFAULT_LOG_FILTER: &str = "info";

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            locale: LocaleSetting::System,
            translations_dir: PathBuf::from(DEFAULT_TRANSLATIONS_DIR),
            resources: DEFAULT_RESOURCES.iter().map(ToString::to_string).collect(),
            duplicate_keys: DuplicatePolicy::KeepFirst,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
            json: false,
        }
    }
}
