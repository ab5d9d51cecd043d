//! Configuration types for zhsplit core library

use crate::splitter::error::SplitterError;
use crate::splitter::separator::{default_separators, FallbackMode};
use crate::splitter::sizer::LengthUnit;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix for environment variable overrides (`ZHSPLIT_CHUNK_SIZE`, ...)
pub const ENV_PREFIX: &str = "ZHSPLIT";

/// Splitter configuration
///
/// Fixed for the lifetime of a splitter instance.
///
/// # Examples
///
/// ```
/// use zhsplit_core::config::SplitterConfig;
///
/// let config = SplitterConfig {
///     chunk_size: 100,
///     chunk_overlap: 0,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// assert_eq!(config.separators.len(), 6);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitterConfig {
    /// Separator patterns, highest priority first
    pub separators: Vec<String>,
    /// Keep separator text attached to the preceding piece
    pub keep_separator: bool,
    /// Treat separators as regular expressions instead of literals
    pub is_separator_regex: bool,
    /// Maximum measured size of a chunk
    pub chunk_size: usize,
    /// Overlap between consecutive merged chunks
    pub chunk_overlap: usize,
    /// How piece and chunk sizes are measured
    pub length_unit: LengthUnit,
    /// Trim whitespace around merged chunks
    pub strip_whitespace: bool,
    /// Record where each chunk starts in its document
    pub add_start_index: bool,
    /// What to split on when no separator occurs in a span
    pub fallback: FallbackMode,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            separators: default_separators(),
            keep_separator: true,
            is_separator_regex: true,
            chunk_size: 250,
            chunk_overlap: 50,
            length_unit: LengthUnit::default(),
            strip_whitespace: true,
            add_start_index: false,
            fallback: FallbackMode::default(),
        }
    }
}

impl SplitterConfig {
    /// Validates configuration parameters
    ///
    /// # Errors
    ///
    /// Returns [`SplitterError::InvalidConfiguration`] if:
    /// - chunk_size is 0
    /// - chunk_overlap is larger than chunk_size
    /// - the separator list is empty
    pub fn validate(&self) -> std::result::Result<(), SplitterError> {
        if self.chunk_size == 0 {
            return Err(SplitterError::invalid_configuration(
                "chunk_size must be greater than 0",
            ));
        }

        if self.chunk_overlap > self.chunk_size {
            return Err(SplitterError::invalid_configuration(format!(
                "chunk_overlap ({}) must not be larger than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }

        if self.separators.is_empty() {
            return Err(SplitterError::invalid_configuration(
                "separators cannot be empty",
            ));
        }

        Ok(())
    }

    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        // Try YAML first, then JSON
        match serde_yaml::from_str(&content) {
            Ok(config) => Ok(config),
            Err(_) => {
                let config = serde_json::from_str(&content)?;
                Ok(config)
            }
        }
    }

    /// Save configuration to a file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from an optional file layered with environment overrides
    ///
    /// Values from `ZHSPLIT_*` variables win over the file, and the file wins
    /// over the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).format(file_format(path)));
        }

        let settings = builder
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let config: SplitterConfig = settings.try_deserialize()?;
        tracing::debug!(
            chunk_size = config.chunk_size,
            chunk_overlap = config.chunk_overlap,
            "Loaded splitter configuration"
        );

        Ok(config)
    }
}

/// Format used to parse a configuration file, chosen from its extension
///
/// Files with any other extension, or none, are read as YAML, which also
/// accepts JSON documents.
fn file_format(path: &Path) -> ::config::FileFormat {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => ::config::FileFormat::Json,
        Some("toml") => ::config::FileFormat::Toml,
        _ => ::config::FileFormat::Yaml,
    }
}
