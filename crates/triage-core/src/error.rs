use core::result::Result as CoreResult;
use std::io::Error as IoError;

use reqwest::Error as ReqwestError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;
use toml::de::Error as TomlError;

/// Result type for core operations.
pub type Result<T> = CoreResult<T, Error>;

/// Errors that can occur in the triage core library.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// An HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] ReqwestError),

    /// JSON serialization or deserialization failed.
    #[error("JSON serialization error: {0}")]
    Json(#[from] SerdeJsonError),

    /// TOML deserialization failed.
    #[error("TOML deserialization error: {0}")]
    Toml(#[from] TomlError),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The cue store could not be written.
    #[error("Cue store error: {0}")]
    Store(String),

    /// A general error not covered by other variants.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Determines whether this error may succeed if retried.
    ///
    /// Returns `true` for transient errors like network failures.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Request(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error1 = Error::Config("missing base url".to_owned());
        assert_eq!(error1.to_string(), "Configuration error: missing base url");

        let error2 = Error::Store("read-only file system".to_owned());
        assert_eq!(error2.to_string(), "Cue store error: read-only file system");

        let error3 = Error::Other("boom".to_owned());
        assert_eq!(error3.to_string(), "boom");
    }

    #[test]
    fn test_error_is_retryable() {
        let error1 = Error::Config("bad config".to_owned());
        assert!(!error1.is_retryable());

        let error2 = Error::Store("disk full".to_owned());
        assert!(!error2.is_retryable());
    }

    #[test]
    fn test_error_from_io() {
        let io_error = IoError::other("underlying");
        let error = Error::from(io_error);
        assert!(matches!(error, Error::Io(_)));
    }
}
