//! Application-wide error types using thiserror.

use tscat_catalog::CatalogError;
use tscat_common::TscatError;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Configuration error; the wrapped error already names itself.
    #[error("{0}")]
    Config(#[from] TscatError),

    /// Catalog loading or writing error.
    #[error("{0}")]
    Catalog(#[from] CatalogError),

    /// Logging could not be initialized.
    #[error("Logging error: {0}")]
    Logging(String),

    /// Output serialization error.
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),

    /// Some files failed `check`.
    #[error("{failed} of {total} catalogs failed to load")]
    CheckFailed {
        /// Number of failing files.
        failed: usize,
        /// Number of checked files.
        total: usize,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the application.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_is_prefixed_once() {
        let err = AppError::from(TscatError::Config("locale must not be empty".to_string()));
        assert_eq!(
            err.to_string(),
            "Configuration error: locale must not be empty"
        );
    }

    #[test]
    fn test_check_failed_message() {
        let err = AppError::CheckFailed { failed: 1, total: 3 };
        assert_eq!(err.to_string(), "1 of 3 catalogs failed to load");
    }
}
