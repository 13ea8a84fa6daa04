//! Locale management and utilities

use crate::error::{CatalogError, CatalogResult};
use std::fmt;
use tracing::debug;
use tscat_common::{language_prefix, LocaleSetting};
use unic_langid::LanguageIdentifier;

/// Environment variables consulted for the system locale, in priority order
pub const LOCALE_ENV_VARS: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

/// A validated language identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    id: LanguageIdentifier,
}

impl Locale {
    /// Parse a locale from `fr`, `fr_FR`, `fr-FR` or `fr_FR.UTF-8`
    pub fn parse(code: &str) -> CatalogResult<Self> {
        let cleaned = code
            .trim()
            .split(['.', '@'])
            .next()
            .unwrap_or_default()
            .replace('_', "-");

        if cleaned.is_empty() {
            return Err(CatalogError::InvalidLocale(code.to_string()));
        }

        let id: LanguageIdentifier = cleaned
            .parse()
            .map_err(|_| CatalogError::InvalidLocale(code.to_string()))?;

        if id.language.as_str() == "und" {
            return Err(CatalogError::InvalidLocale(code.to_string()));
        }

        Ok(Self { id })
    }

    /// English, the source language of the application
    pub fn english() -> Self {
        Self::from_static("en")
    }

    /// French
    pub fn french() -> Self {
        Self::from_static("fr")
    }

    fn from_static(code: &'static str) -> Self {
        Self {
            id: code.parse().unwrap_or_default(),
        }
    }

    /// Locales shipped with translations
    pub fn supported() -> Vec<Self> {
        vec![Self::english(), Self::french()]
    }

    /// Resolve a setting to a concrete locale
    pub fn resolve(setting: &LocaleSetting) -> CatalogResult<Self> {
        match setting {
            LocaleSetting::System => Ok(Self::from_environment()),
            LocaleSetting::Explicit(code) => Self::parse(code),
        }
    }

    /// The operating system locale, reduced to its language
    pub fn from_environment() -> Self {
        Self::from_env_values(
            LOCALE_ENV_VARS
                .iter()
                .map(|name| std::env::var(name).ok()),
        )
    }

    /// Pick the first usable value among locale variables; English otherwise.
    ///
    /// Only the two-letter language prefix is kept, so `fr_CA.UTF-8` gives `fr`.
    pub fn from_env_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<String>>,
    {
        let locale = values
            .into_iter()
            .flatten()
            .find(|value| !value.trim().is_empty())
            .and_then(|value| language_prefix(&value))
            .and_then(|prefix| Self::parse(&prefix).ok())
            .unwrap_or_else(Self::english);

        debug!("System locale resolved to {}", locale);
        locale
    }

    /// Full language identifier, e.g. `fr-CA`
    pub fn code(&self) -> String {
        self.id.to_string()
    }

    /// Language subtag used in resource file names, e.g. `fr`
    pub fn short_code(&self) -> &str {
        self.id.language.as_str()
    }

    /// Underlying language identifier
    pub const fn language_identifier(&self) -> &LanguageIdentifier {
        &self.id
    }

    /// Whether this is the language source strings are written in
    pub fn is_source_language(&self) -> bool {
        self.short_code() == "en"
    }

    /// Get the display name for this locale
    pub fn display_name(&self) -> String {
        match self.short_code() {
            "en" => "English".to_string(),
            "fr" => "Français".to_string(),
            _ => self.code(),
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::english()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
