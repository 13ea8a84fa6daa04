//! Error types for catalog operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, saving or selecting catalogs
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The resource is not a structurally valid translation catalog
    #[error("Malformed translation resource at byte {position}: {reason}")]
    MalformedResource {
        /// What is wrong with the markup
        reason: String,
        /// Byte offset where the problem was detected
        position: u64,
    },

    /// The same key appears twice in one context
    #[error("Duplicate message '{source_text}' in context '{context}'")]
    DuplicateKey {
        /// Context holding both messages
        context: String,
        /// Source text of the repeated message
        source_text: String,
    },

    /// A catalog file could not be read
    #[error("Failed to load resource file {}: {source}", path.display())]
    ResourceLoadError {
        /// File that could not be read
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// A locale code could not be parsed
    #[error("Invalid locale: {0}")]
    InvalidLocale(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CatalogError {
    /// Whether the error means a catalog file simply does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ResourceLoadError { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;
