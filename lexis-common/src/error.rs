//! Error types for the Lexis services.

use thiserror::Error;

/// Result type alias using the Lexis error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for Lexis services.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error, including an inconsistent lexicon definition
    #[error("Configuration error: {0}")]
    Config(String),

    /// Authentication error
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Authorization error
    #[error("Authorization error: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input or request
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Optimistic concurrency check failed
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Persistence backend failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create an error with additional context.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Check if this is a version conflict, looking through context wrappers.
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::Conflict(_) => true,
            Self::WithContext { source, .. } => source.is_conflict(),
            _ => false,
        }
    }

    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Auth(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::Conflict(_) => "CONFLICT",
            Self::Storage(_) | Self::Io(_) => "STORAGE_ERROR",
            Self::WithContext { source, .. } => source.code(),
            _ => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Auth(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::InvalidInput(_) => 400,
            Self::Conflict(_) => 409,
            Self::WithContext { source, .. } => source.status_code(),
            _ => 500,
        }
    }
}

/// Extension trait for adding context to any error type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(Error::Auth("test".into()).status_code(), 401);
        assert_eq!(Error::Forbidden("test".into()).status_code(), 403);
        assert_eq!(Error::NotFound("test".into()).status_code(), 404);
        assert_eq!(Error::InvalidInput("test".into()).status_code(), 400);
        assert_eq!(Error::Conflict("test".into()).status_code(), 409);
        assert_eq!(Error::Storage("test".into()).status_code(), 500);
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::Conflict("version 3 expected, found 4".into());
        let with_ctx = err.with_context("saving adaptive lexicon");
        assert!(matches!(with_ctx, Error::WithContext { .. }));
        assert!(with_ctx.is_conflict());
        assert_eq!(with_ctx.status_code(), 409);
        assert_eq!(with_ctx.code(), "CONFLICT");
    }

    #[test]
    fn test_result_ext_wraps_io() {
        let io: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
        let err = io.context("writing results").unwrap_err();
        assert_eq!(err.code(), "STORAGE_ERROR");
        assert!(err.to_string().starts_with("writing results"));
    }
}
