//! zhsplit CLI Library
//!
//! Command-line interface components for the zhsplit text splitter.

use zhsplit_core::{SplitterError, ZhsplitError};

pub mod commands;
pub mod config;
pub mod output;

pub use commands::*;
pub use config::*;
pub use output::*;

/// CLI version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the CLI environment
pub fn init() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("zhsplit encountered an error: {}", info);
    }));
}

/// Get the appropriate exit code for an error
pub fn exit_code_for_error(error: &ZhsplitError) -> i32 {
    match error {
        ZhsplitError::Validation { .. } | ZhsplitError::Config(_) => 2,
        ZhsplitError::NotFound { .. } => 3,
        ZhsplitError::Io(_) => 4,
        ZhsplitError::Splitter(SplitterError::ZeroWidthMatch { .. }) => 5,
        ZhsplitError::Splitter(_) => 2,
        _ => 1,
    }
}
