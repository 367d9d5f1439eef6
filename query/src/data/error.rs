//! Error types for the query core
//!
//! The predicate compiler is infallible. Failures come from three places:
//! resolving a field reference, decoding filter input, and executing a query
//! against the store.

use thiserror::Error;

/// A field reference could not be mapped to a concrete column
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Unknown custom field: cf_{0}")]
    UnknownCustomField(i64),

    #[error("Cannot sort by field: {0}")]
    UnsortableField(String),
}

/// Unified error type for query operations
#[derive(Error, Debug)]
pub enum QueryError {
    /// Field resolution failed
    #[error("Resolution error: {0}")]
    Resolution(#[from] ResolutionError),

    /// Store error, surfaced verbatim
    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),

    /// Filter input could not be decoded
    #[error("Invalid filter ({code}): {message}")]
    InvalidFilter { code: &'static str, message: String },
}

impl QueryError {
    pub fn invalid_filter(code: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidFilter {
            code,
            message: message.into(),
        }
    }

    /// Check if this is a connection-related error that might be transient
    ///
    /// The query core never retries; this is for the orchestration layer.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Store(e) => matches!(
                e,
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
            ),
            Self::Resolution(_) | Self::InvalidFilter { .. } => false,
        }
    }

    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::Resolution(ResolutionError::UnknownField(_)) => "UNKNOWN_FIELD",
            Self::Resolution(ResolutionError::UnknownCustomField(_)) => "UNKNOWN_CUSTOM_FIELD",
            Self::Resolution(ResolutionError::UnsortableField(_)) => "UNSORTABLE_FIELD",
            Self::Store(_) => "STORE_ERROR",
            Self::InvalidFilter { code, .. } => *code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_error_display() {
        let err = QueryError::from(ResolutionError::UnknownField("colour".to_string()));
        assert_eq!(err.to_string(), "Resolution error: Unknown field: colour");
        assert_eq!(err.code(), "UNKNOWN_FIELD");
    }

    #[test]
    fn test_unknown_custom_field_display() {
        let err = ResolutionError::UnknownCustomField(12);
        assert_eq!(err.to_string(), "Unknown custom field: cf_12");
    }

    #[test]
    fn test_invalid_filter_display() {
        let err = QueryError::invalid_filter("TOO_MANY_FILTERS", "Maximum 50 filters allowed");
        assert_eq!(
            err.to_string(),
            "Invalid filter (TOO_MANY_FILTERS): Maximum 50 filters allowed"
        );
        assert_eq!(err.code(), "TOO_MANY_FILTERS");
    }

    #[test]
    fn test_is_transient() {
        assert!(QueryError::Store(sqlx::Error::PoolTimedOut).is_transient());
        assert!(QueryError::Store(sqlx::Error::PoolClosed).is_transient());
        assert!(!QueryError::Store(sqlx::Error::RowNotFound).is_transient());
        assert!(!QueryError::from(ResolutionError::UnknownCustomField(1)).is_transient());
        assert!(!QueryError::invalid_filter("INVALID_FILTER_JSON", "bad").is_transient());
    }
}
