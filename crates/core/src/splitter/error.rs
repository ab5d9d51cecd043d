//! Error types for recursive text splitting

use thiserror::Error;

/// Result type alias for splitter operations
pub type Result<T> = std::result::Result<T, SplitterError>;

/// Errors that can occur while configuring or running a splitter
#[derive(Error, Debug)]
pub enum SplitterError {
    /// A separator could not be compiled as a regular expression
    #[error("Invalid separator pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A separator pattern matches the empty string and would never advance
    #[error("Separator pattern '{pattern}' matches the empty string")]
    ZeroWidthPattern { pattern: String },

    /// A separator produced a zero-width match while splitting
    #[error("Separator pattern '{pattern}' produced a zero-width match at byte {offset}")]
    ZeroWidthMatch { pattern: String, offset: usize },

    /// Invalid configuration parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl SplitterError {
    /// Create an invalid configuration error
    pub fn invalid_configuration<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    /// Check whether the error comes from the separator list rather than the input
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidPattern { .. } | Self::ZeroWidthPattern { .. } | Self::InvalidConfiguration(_)
        )
    }
}
