//! Error types for the planets cache layer.
//!
//! One `thiserror` hierarchy shared by every crate in the workspace. Absence of a
//! record is never an error here: lookups return `Option` and deletes return `bool`.

use thiserror::Error;

/// Result type alias using `PlanetsError`.
pub type Result<T> = std::result::Result<T, PlanetsError>;

/// Main error type for all planets operations.
#[derive(Debug, Error)]
pub enum PlanetsError {
    // ═══════════════════════════════════════════════════════════════════════════
    // EXTERNAL SOURCE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The external source could not be reached, answered with a non-success
    /// status, returned a malformed page, or handed back an unusable cursor.
    #[error("External source unavailable: {0}")]
    SourceUnavailable(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // CACHE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The cache store is unreachable, rejected a command, or timed out.
    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // REPOSITORY ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// A uniqueness constraint was violated by a write.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The repository failed for a reason other than a conflict.
    #[error("Repository error: {0}")]
    RepositoryError(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ═══════════════════════════════════════════════════════════════════════════
    // VALIDATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Input validation failed.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // INTERNAL ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Internal invariant violation (should never happen).
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl PlanetsError {
    /// Returns true if a later attempt may succeed without any change on our side.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PlanetsError::SourceUnavailable(_) | PlanetsError::CacheUnavailable(_)
        )
    }

    /// Returns true if this error came from the cache store.
    pub fn is_cache_error(&self) -> bool {
        matches!(self, PlanetsError::CacheUnavailable(_))
    }

    /// Returns true if this is a validation error.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            PlanetsError::ValidationError(_) | PlanetsError::ConfigError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PlanetsError::Conflict("planet 'Hoth' already exists".into());
        assert!(err.to_string().contains("Hoth"));
        assert!(err.to_string().starts_with("Conflict"));
    }

    #[test]
    fn test_error_classification() {
        assert!(PlanetsError::SourceUnavailable("test".into()).is_recoverable());
        assert!(PlanetsError::CacheUnavailable("test".into()).is_recoverable());
        assert!(!PlanetsError::Conflict("test".into()).is_recoverable());

        assert!(PlanetsError::CacheUnavailable("test".into()).is_cache_error());
        assert!(!PlanetsError::SourceUnavailable("test".into()).is_cache_error());

        assert!(PlanetsError::ValidationError("test".into()).is_validation_error());
        assert!(!PlanetsError::RepositoryError("test".into()).is_validation_error());
    }

    #[test]
    fn test_json_error_conversion() {
        let json_result: std::result::Result<serde_json::Value, _> = serde_json::from_str("invalid");
        let result: Result<serde_json::Value> = json_result.map_err(PlanetsError::from);
        assert!(matches!(result, Err(PlanetsError::JsonError(_))));
    }
}
