//! zhsplit Core Library
//!
//! Recursive text splitting for mixed Chinese/Latin text. Text is broken
//! into bounded-size chunks suitable for embedding and indexing, using a
//! prioritized list of separators from paragraph breaks down to clause
//! punctuation.

pub mod config;
pub mod error;
pub mod splitter;

// Re-export commonly used types
pub use config::SplitterConfig;
pub use error::{Result, ZhsplitError};
pub use splitter::{
    normalize_chunk, Chunk, ChunkMetadata, ChunkMerger, ChunkSizer, Document, FallbackMode,
    LengthUnit, OverlapMerger, RecursiveSplitter, SplitterError, TextSplitter,
    DEFAULT_SEPARATORS,
};

/// Initialize logging with JSON formatting
pub fn init_logging() -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zhsplit_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| ZhsplitError::validation(format!("Failed to initialize logger: {}", e)))?;

    Ok(())
}

/// Initialize logging with custom configuration
///
/// Logs always go to stderr so chunk output on stdout stays machine-readable.
pub fn init_logging_with_config(level: &str, format: &str) -> Result<()> {
    use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match format {
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        "text" | "pretty" => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init(),
        "compact" => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        _ => {
            return Err(ZhsplitError::validation(format!(
                "Unknown log format: {}",
                format
            )));
        }
    };

    result.map_err(|e| ZhsplitError::validation(format!("Failed to initialize logger: {}", e)))
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get version info as a formatted string
pub fn version_info() -> String {
    format!("{} v{} - {}", NAME, VERSION, DESCRIPTION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_info() {
        let info = version_info();
        assert!(info.contains(VERSION));
        assert!(info.starts_with("zhsplit-core"));
    }

    #[test]
    fn test_unknown_log_format() {
        assert!(init_logging_with_config("info", "xml").is_err());
    }
}
