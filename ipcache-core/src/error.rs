//! Error types for ipcache.
//!
//! Every failure a store can report is a [`StoreError`]. The cache layer never
//! classifies or rewrites these; it hands them back to the caller unchanged.

use thiserror::Error;

/// Result type alias using `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Failure reported by a key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    // ═══════════════════════════════════════════════════════════════════════════
    // LOOKUP ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Key does not exist in the store.
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Store could not be reached or refused the request.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Value is not a valid IPv4 address.
    #[error("Invalid value for '{key}': {value} is not an IPv4 address")]
    InvalidValue { key: String, value: String },

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION & I/O ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal invariant violation (should never happen).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Returns true if this error is transient (the same call may succeed later).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }

    /// Returns true if the store answered that the key is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_error_display() {
        let err = StoreError::InvalidValue {
            key: "10.0.0.1".into(),
            value: "not-an-ip".into(),
        };
        assert!(err.to_string().contains("10.0.0.1"));
        assert!(err.to_string().contains("not-an-ip"));
    }

    #[test_case(StoreError::Unavailable("timeout".into()), true ; "unavailable")]
    #[test_case(StoreError::NotFound("k".into()), false ; "not found")]
    #[test_case(StoreError::Config("zero".into()), false ; "config")]
    #[test_case(StoreError::Internal("bug".into()), false ; "internal")]
    fn test_error_classification(err: StoreError, recoverable: bool) {
        assert_eq!(err.is_recoverable(), recoverable);
    }

    #[test]
    fn test_not_found() {
        assert!(StoreError::NotFound("k".into()).is_not_found());
        assert!(!StoreError::Unavailable("down".into()).is_not_found());
    }

    #[test]
    fn test_json_error_conversion() {
        let json_result: std::result::Result<serde_json::Value, _> = serde_json::from_str("invalid");
        let store_result: Result<serde_json::Value> = json_result.map_err(StoreError::from);
        assert!(matches!(store_result, Err(StoreError::Json(_))));
    }
}
