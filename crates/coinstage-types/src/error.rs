//! Error types for the coinstage order staging cache.
//!
//! All errors use the `CS_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Validation and lookup errors
//! - 2xx: Key-value store errors
//! - 3xx: Serialization errors
//! - 9xx: Configuration / internal errors
//!
//! Nothing in the cache retries; every variant reaches the caller, who owns
//! the retry and backoff policy.

use thiserror::Error;

/// Central error enum for all staging cache operations.
#[derive(Debug, Error)]
pub enum StagingError {
    // =================================================================
    // Validation / Lookup (1xx)
    // =================================================================
    /// Bad input shape or values. Raised before any store call.
    #[error("CS_ERR_100: Validation failed: {reason}")]
    Validation { reason: String },

    /// The referenced identifier has no entry in the bucket.
    #[error("CS_ERR_101: Order {id} not found in {bucket}")]
    NotFound { bucket: String, id: String },

    // =================================================================
    // Store (2xx)
    // =================================================================
    /// Transport or store failure.
    #[error("CS_ERR_200: Store unavailable: {reason}")]
    StoreUnavailable { reason: String },

    // =================================================================
    // Serialization (3xx)
    // =================================================================
    /// A stored value could not be decoded (truncated, corrupted, or
    /// missing fields).
    #[error("CS_ERR_300: Serialization error: {reason}")]
    Serialization { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Configuration error (invalid config file, missing fields, etc.).
    #[error("CS_ERR_902: Configuration error: {0}")]
    Configuration(String),

    /// I/O error (reading configuration from disk).
    #[error("CS_ERR_903: I/O error: {0}")]
    Io(String),
}

impl StagingError {
    #[must_use]
    pub fn not_found(bucket: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            bucket: bucket.into(),
            id: id.into(),
        }
    }

    #[must_use]
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn serialization(reason: impl Into<String>) -> Self {
        Self::Serialization {
            reason: reason.into(),
        }
    }

    /// Whether a caller may reasonably retry the same call later.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::StoreUnavailable { .. } | Self::Io(_))
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, StagingError>;

impl From<std::io::Error> for StagingError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StagingError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = StagingError::not_found("PENDING:ORDER:testKey", "testUuid");
        let msg = format!("{err}");
        assert!(msg.starts_with("CS_ERR_101"), "Got: {msg}");
        assert!(msg.contains("PENDING:ORDER:testKey"));
        assert!(msg.contains("testUuid"));
    }

    #[test]
    fn json_error_maps_to_serialization() {
        let err: StagingError = serde_json::from_str::<serde_json::Value>("{\"a\":")
            .unwrap_err()
            .into();
        assert!(matches!(err, StagingError::Serialization { .. }));
    }

    #[test]
    fn only_store_and_io_are_transient() {
        assert!(StagingError::StoreUnavailable { reason: "down".into() }.is_transient());
        assert!(StagingError::Io("eof".into()).is_transient());
        assert!(!StagingError::validation("bad").is_transient());
        assert!(!StagingError::not_found("b", "i").is_transient());
    }

    #[test]
    fn all_errors_have_cs_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(StagingError::validation("x")),
            Box::new(StagingError::not_found("b", "i")),
            Box::new(StagingError::StoreUnavailable { reason: "r".into() }),
            Box::new(StagingError::serialization("s")),
            Box::new(StagingError::Configuration("c".into())),
            Box::new(StagingError::Io("io".into())),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("CS_ERR_"),
                "Error missing CS_ERR_ prefix: {msg}"
            );
        }
    }
}
