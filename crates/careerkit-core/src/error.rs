//! Error types for `careerkit-core`.
//!
//! Fallible operations return [`CoreResult<T>`], an alias for
//! `Result<T, CoreError>`. Expected rejections (rate-limit denials, bad
//! input) are *not* errors; they are ordinary return values such as
//! [`RateDecision::Denied`](crate::guard::RateDecision::Denied) or
//! [`ValidationError`](crate::security::ValidationError).

use std::path::PathBuf;

/// Unified error type for core operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The configuration file does not exist.
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    /// The process lacks permission to read the path.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Failed to parse a TOML configuration file.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// A rate limit was requested with a zero window or zero budget.
    ///
    /// This is a caller bug, never a runtime condition.
    #[error("invalid rate limit: {0}")]
    InvalidLimit(String),

    /// An I/O error that doesn't fit a more specific variant.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout `careerkit-core`.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn not_found_displays_path() {
        let err = CoreError::NotFound(PathBuf::from("/etc/careerkit.toml"));
        assert_eq!(err.to_string(), "path not found: /etc/careerkit.toml");
    }

    #[test]
    fn permission_denied_displays_path() {
        let err = CoreError::PermissionDenied(PathBuf::from("/secret"));
        assert_eq!(err.to_string(), "permission denied: /secret");
    }

    #[test]
    fn config_parse_displays_message() {
        let err = CoreError::ConfigParse("unexpected token".to_string());
        assert_eq!(err.to_string(), "config parse error: unexpected token");
    }

    #[test]
    fn invalid_limit_displays_message() {
        let err = CoreError::InvalidLimit("window must be positive".to_string());
        assert_eq!(err.to_string(), "invalid rate limit: window must be positive");
    }

    #[test]
    fn io_error_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let core_err: CoreError = io_err.into();
        assert!(matches!(core_err, CoreError::Io(_)));
        assert!(core_err.to_string().contains("disk gone"));
    }

    #[test]
    fn error_is_debug() {
        let err = CoreError::InvalidLimit("zero".to_string());
        assert!(format!("{err:?}").contains("InvalidLimit"));
    }
}
