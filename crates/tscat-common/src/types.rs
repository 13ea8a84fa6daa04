//! Common type definitions shared between the catalog, config and CLI crates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Keyword used in configuration files to follow the operating system locale.
pub const SYSTEM_LOCALE: &str = "system";

/// Which language the application should be displayed in.
///
/// Serialized as the string `"system"` or as a language code such as `"fr"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LocaleSetting {
    /// Follow the operating system locale, re-evaluated on every switch.
    #[default]
    System,
    /// A fixed language code chosen by the user.
    Explicit(String),
}

impl LocaleSetting {
    /// Creates an explicit setting for the given language code.
    pub fn explicit(code: impl Into<String>) -> Self {
        Self::Explicit(code.into())
    }

    /// Whether this setting follows the operating system.
    #[must_use]
    pub const fn is_system(&self) -> bool {
        matches!(self, Self::System)
    }
}

impl From<String> for LocaleSetting {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(SYSTEM_LOCALE) {
            Self::System
        } else {
            Self::Explicit(trimmed.to_string())
        }
    }
}

impl From<&str> for LocaleSetting {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<LocaleSetting> for String {
    fn from(value: LocaleSetting) -> Self {
        value.to_string()
    }
}

impl fmt::Display for LocaleSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::System => f.write_str(SYSTEM_LOCALE),
            Self::Explicit(code) => f.write_str(code),
        }
    }
}

/// What the catalog loader does when a context contains the same key twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep the first occurrence and log a warning.
    #[default]
    KeepFirst,
    /// Abort loading with a duplicate key error.
    Reject,
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeepFirst => f.write_str("keep_first"),
            Self::Reject => f.write_str("reject"),
        }
    }
}

/// Common result type for the application.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Application-wide error type.
#[derive(thiserror::Error, Debug)]
pub enum TscatError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Translation catalog error.
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}
