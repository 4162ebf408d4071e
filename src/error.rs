//! Error types for cadence.

use thiserror::Error;

/// Errors that can occur while managing tasks.
#[derive(Error, Debug)]
pub enum CadenceError {
    /// A recurrence rule cannot be expanded (bad interval, unknown kind,
    /// missing due date).
    #[error("Invalid recurrence: {0}")]
    InvalidRecurrence(String),

    /// Input failed validation (empty title, out-of-range progress).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The requested task does not exist or belongs to another user.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A list filter could not be built (e.g. a malformed search pattern).
    #[error("Invalid filter: {0}")]
    Filter(String),

    /// Input or stored data could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A `SQLite` operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration could not be read, written, or resolved.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for CadenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<rusqlite::Error> for CadenceError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CadenceError::InvalidRecurrence("interval must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid recurrence: interval must be positive");

        let err = CadenceError::NotFound("task abc".to_string());
        assert_eq!(err.to_string(), "Not found: task abc");
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: CadenceError = json_err.into();
        assert!(matches!(err, CadenceError::Parse(_)));
    }
}
