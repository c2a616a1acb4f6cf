//! Result and error types for fleetprobe.

use thiserror::Error;

/// Result type for fleetprobe operations
pub type FleetResult<T> = Result<T, FleetError>;

/// Errors that can occur while driving the application UI
#[derive(Debug, Error)]
pub enum FleetError {
    /// A targeted control did not appear within the wait window
    #[error("Element not found: {description} (waited {timeout_ms}ms)")]
    ElementNotFound {
        /// What was being located
        description: String,
        /// Wait window in milliseconds
        timeout_ms: u64,
    },

    /// A UI state did not settle within the wait window
    #[error("Timed out after {ms}ms waiting for {waited_for}")]
    Timeout {
        /// What was being waited for
        waited_for: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// More than one element satisfied a selection that must be unique
    #[error("Ambiguous match: {count} elements match {description}")]
    AmbiguousMatch {
        /// What was being located
        description: String,
        /// Number of candidates found
        count: usize,
    },

    /// Observed UI state did not match the expectation
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// An intercepted network response did not match the expected contract
    #[error("Unexpected response from {url}: status {status}, expected {expected}")]
    UnexpectedResponse {
        /// Response URL
        url: String,
        /// Observed status code
        status: u16,
        /// Expected status code
        expected: u16,
    },

    /// Date value could not be built
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Error message
        message: String,
    },

    /// Time value could not be built
    #[error("Invalid time: {message}")]
    InvalidTime {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    NavigationError {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Underlying driver failure
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Suite configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl FleetError {
    /// Create an assertion failure
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }

    /// Create a driver error
    #[must_use]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this error means "the UI never reached the expected state"
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::ElementNotFound { .. } | Self::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_not_found_message() {
        let err = FleetError::ElementNotFound {
            description: ".ant-picker-cell \"19\"".to_string(),
            timeout_ms: 4000,
        };
        assert_eq!(
            err.to_string(),
            "Element not found: .ant-picker-cell \"19\" (waited 4000ms)"
        );
        assert!(err.is_timeout());
    }

    #[test]
    fn test_unexpected_response_message() {
        let err = FleetError::UnexpectedResponse {
            url: "https://fleet.test/api/login".to_string(),
            status: 401,
            expected: 200,
        };
        assert!(err.to_string().contains("status 401, expected 200"));
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.pdf");
        let err: FleetError = io.into();
        assert!(matches!(err, FleetError::Io(_)));
    }
}
