//! Error handling for zhsplit core library

use crate::splitter::SplitterError;
use thiserror::Error;

/// Result type alias for zhsplit operations
pub type Result<T> = std::result::Result<T, ZhsplitError>;

/// Main error type for zhsplit operations
#[derive(Error, Debug)]
pub enum ZhsplitError {
    /// IO-related errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration loading errors
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    /// Splitting errors
    #[error("Splitter error: {0}")]
    Splitter(#[from] SplitterError),

    /// Generic errors
    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Resource not found errors
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },
}

impl ZhsplitError {
    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Check if the error was caused by bad configuration or arguments
    pub fn is_configuration_error(&self) -> bool {
        match self {
            Self::Config(_) | Self::Validation { .. } => true,
            Self::Splitter(err) => err.is_configuration_error(),
            _ => false,
        }
    }

    /// Get error category for logging/metrics
    pub fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Json(_) | Self::Yaml(_) => "serialization",
            Self::Config(_) => "config",
            Self::Splitter(_) => "splitter",
            Self::Generic(_) => "generic",
            Self::Validation { .. } => "validation",
            Self::NotFound { .. } => "not_found",
        }
    }
}
