//! CLI configuration module

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use zhsplit_core::{Result, SplitterConfig, ZhsplitError};

/// File name of the per-user configuration file
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Yaml,
    #[default]
    Pretty,
    Compact,
    Table,
}

impl OutputFormat {
    /// Whether the format is meant for other programs rather than people
    pub fn is_machine_readable(self) -> bool {
        matches!(self, Self::Json | Self::Yaml | Self::Compact)
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
            Self::Pretty => write!(f, "pretty"),
            Self::Compact => write!(f, "compact"),
            Self::Table => write!(f, "table"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = ZhsplitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "table" => Ok(Self::Table),
            _ => Err(ZhsplitError::validation(format!(
                "Invalid output format: {}",
                s
            ))),
        }
    }
}

/// Log level options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Level used for the global `--verbose` flag
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            Self::Debug
        } else {
            Self::Info
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = ZhsplitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(ZhsplitError::validation(format!("Invalid log level: {}", s))),
        }
    }
}

/// Get the default configuration directory (`~/.config/zhsplit` on Linux)
pub fn default_config_dir() -> Result<PathBuf> {
    let config_dir = if let Some(dir) = dirs::config_dir() {
        dir.join("zhsplit")
    } else {
        std::env::current_dir()?.join(".zhsplit")
    };

    Ok(config_dir)
}

/// Get the default configuration file path
pub fn default_config_path() -> Result<PathBuf> {
    Ok(default_config_dir()?.join(CONFIG_FILE_NAME))
}

/// Pick the configuration file to load
///
/// An explicit path must exist. Without one, the per-user file is used when
/// present.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(ZhsplitError::not_found(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }
        return Ok(Some(path.to_path_buf()));
    }

    let default_path = default_config_path()?;
    Ok(default_path.exists().then_some(default_path))
}

/// Load the splitter configuration: defaults, then config file, then `ZHSPLIT_*` variables
pub fn load_splitter_config(explicit: Option<&Path>) -> Result<SplitterConfig> {
    let path = resolve_config_path(explicit)?;
    if let Some(path) = &path {
        tracing::debug!("Using configuration file {:?}", path);
    }
    SplitterConfig::load(path.as_deref())
}

/// Check if output supports colors
pub fn supports_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    // Check if we're connected to a terminal
    atty::is(atty::Stream::Stdout)
}
