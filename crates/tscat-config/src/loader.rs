//! Configuration loading and persistence with atomic file operations.

use crate::schema::{Config, ConfigResult};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tscat_common::{LocaleSetting, TscatError};

/// Environment variables that override values read from the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigEnv {
    /// Overrides `i18n.locale`.
    Locale,
    /// Overrides `i18n.translations_dir`.
    TranslationsDir,
}

impl ConfigEnv {
    /// All overrides, in application order.
    pub const ALL: [Self; 2] = [Self::Locale, Self::TranslationsDir];

    /// Returns the environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Locale => "TSCAT_LOCALE",
            Self::TranslationsDir => "TSCAT_TRANSLATIONS_DIR",
        }
    }
}

/// Serialization format, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.toml`
    Toml,
    /// `.yaml` or `.yml`
    Yaml,
    /// `.json`
    Json,
}

impl ConfigFormat {
    /// Detects the format of `path` from its extension.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("toml") => Ok(Self::Toml),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(TscatError::Config(format!(
                "Unsupported configuration format: {}",
                path.display()
            ))),
        }
    }

    /// Parses `contents` in this format.
    pub fn parse(self, contents: &str) -> ConfigResult<Config> {
        match self {
            Self::Toml => toml::from_str(contents).map_err(|e| serialization(&e)),
            Self::Yaml => serde_yaml::from_str(contents).map_err(|e| serialization(&e)),
            Self::Json => serde_json::from_str(contents).map_err(|e| serialization(&e)),
        }
    }

    /// Serializes `config` in this format.
    pub fn render(self, config: &Config) -> ConfigResult<String> {
        match self {
            Self::Toml => toml::to_string_pretty(config).map_err(|e| serialization(&e)),
            Self::Yaml => serde_yaml::to_string(config).map_err(|e| serialization(&e)),
            Self::Json => serde_json::to_string_pretty(config).map_err(|e| serialization(&e)),
        }
    }
}

fn serialization(err: &dyn std::fmt::Display) -> TscatError {
    TscatError::Serialization(err.to_string())
}

/// Configuration loader with atomic file operations.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    path: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the configuration file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads configuration from file, applies environment overrides and
    /// validates the result.
    pub async fn load(&self) -> ConfigResult<Config> {
        let format = ConfigFormat::from_path(&self.path)?;
        debug!("Loading configuration from {}", self.path.display());

        let contents = tokio::fs::read_to_string(&self.path).await?;
        let mut config = format.parse(&contents)?;
        apply_env_overrides(&mut config);
        config.validate()?;

        info!("Configuration loaded from {}", self.path.display());
        Ok(config)
    }

    /// Like [`ConfigLoader::load`], but a missing file yields the defaults
    /// with environment overrides applied.
    pub async fn load_or_default(&self) -> ConfigResult<Config> {
        match tokio::fs::try_exists(&self.path).await {
            Ok(true) => self.load().await,
            Ok(false) => {
                debug!(
                    "No configuration at {}, using defaults",
                    self.path.display()
                );
                let mut config = Config::default();
                apply_env_overrides(&mut config);
                config.validate()?;
                Ok(config)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Saves configuration to file atomically.
    ///
    /// The file is written to a temporary sibling and renamed over the
    /// target, so readers never observe a partial file.
    pub async fn save(&self, config: &Config) -> ConfigResult<()> {
        config.validate()?;
        let contents = ConfigFormat::from_path(&self.path)?.render(config)?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || write_atomic(&path, contents.as_bytes()))
            .await
            .map_err(|e| TscatError::Config(format!("Configuration save task failed: {e}")))??;

        info!("Configuration saved to {}", self.path.display());
        Ok(())
    }
}

fn write_atomic(path: &Path, contents: &[u8]) -> ConfigResult<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = tempfile::NamedTempFile::new_in(parent)?;
    file.write_all(contents)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| TscatError::Io(e.error))?;
    Ok(())
}

/// Applies `TSCAT_*` environment overrides to `config`.
pub fn apply_env_overrides(config: &mut Config) {
    apply_overrides_from(config, |name| std::env::var(name).ok());
}

/// Applies overrides read through `lookup`; empty values are ignored.
pub fn apply_overrides_from<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    for var in ConfigEnv::ALL {
        let Some(value) = lookup(var.as_str()).filter(|v| !v.trim().is_empty()) else {
            continue;
        };
        debug!("Applying override {}={}", var.as_str(), value);

        match var {
            ConfigEnv::Locale => config.i18n.locale = LocaleSetting::from(value),
            ConfigEnv::TranslationsDir => config.i18n.translations_dir = PathBuf::from(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tscat_common::test_utils::config_fixtures;

    #[test]
    fn test_format_detection() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("tscat.toml")).unwrap(),
            ConfigFormat::Toml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("tscat.YML")).unwrap(),
            ConfigFormat::Yaml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("tscat.json")).unwrap(),
            ConfigFormat::Json
        );
        assert!(ConfigFormat::from_path(Path::new("tscat.ini")).is_err());
        assert!(ConfigFormat::from_path(Path::new("tscat")).is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ConfigFormat::Toml
            .parse(config_fixtures::minimal_config_toml())
            .unwrap();
        assert_eq!(config.i18n.locale, LocaleSetting::explicit("fr"));
        assert_eq!(config.i18n.resources, vec!["qt", "app"]);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let err = ConfigFormat::Toml
            .parse("[i18n]\nlanguage = \"fr\"\n")
            .unwrap_err();
        assert!(matches!(err, TscatError::Serialization(_)));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("TSCAT_LOCALE", "fr_FR"),
            ("TSCAT_TRANSLATIONS_DIR", "  "),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        apply_overrides_from(&mut config, |name| vars.get(name).map(ToString::to_string));

        assert_eq!(config.i18n.locale, LocaleSetting::explicit("fr_FR"));
        assert_eq!(config.i18n.translations_dir, PathBuf::from("translations"));
    }
}
