//! Error types for the CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid argument
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },

    /// Command needs a cargo feature this binary was built without
    #[error("{command} needs the `{feature}` feature; rebuild with --features {feature}")]
    FeatureDisabled {
        /// Command name
        command: String,
        /// Missing feature
        feature: String,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Library error
    #[error("{0}")]
    Fleet(#[from] fleetprobe::FleetError),
}

impl CliError {
    /// Create an invalid argument error
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a feature-disabled error
    #[must_use]
    pub fn feature_disabled(command: impl Into<String>, feature: impl Into<String>) -> Self {
        Self::FeatureDisabled {
            command: command.into(),
            feature: feature.into(),
        }
    }
}
