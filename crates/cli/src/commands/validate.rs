//! Validate command implementation

use clap::Args;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use zhsplit_core::{RecursiveSplitter, Result, SplitterConfig, ZhsplitError};

use crate::commands::CliCommand;
use crate::config::OutputFormat;
use crate::output::OutputFormatter;

/// Check that a splitter configuration file loads and compiles
#[derive(Debug, Clone, Default, Args)]
pub struct ValidateCommand {
    /// Configuration file to validate
    pub file: PathBuf,

    /// Output format, set from the global `--output` option
    #[arg(skip)]
    pub output_format: OutputFormat,
}

impl CliCommand for ValidateCommand {
    async fn execute(&self) -> Result<()> {
        let mut formatter = OutputFormatter::with_format(self.output_format, true);
        self.run(&mut formatter)
    }

    fn name(&self) -> &'static str {
        "validate"
    }

    fn validate(&self) -> Result<()> {
        if !self.file.exists() {
            return Err(ZhsplitError::not_found(format!(
                "Configuration file not found: {}",
                self.file.display()
            )));
        }
        Ok(())
    }
}

impl ValidateCommand {
    /// Validate the file and report through `formatter`
    ///
    /// Returns a validation error when any check failed.
    pub fn run(&self, formatter: &mut OutputFormatter) -> Result<()> {
        let result = Self::check(&self.file);

        if formatter.format().is_machine_readable() {
            formatter.output(&result)?;
        } else {
            Self::output_text_results(formatter, &result)?;
        }

        if result.valid {
            Ok(())
        } else {
            Err(ZhsplitError::validation(format!(
                "Configuration is invalid: {}",
                self.file.display()
            )))
        }
    }

    /// Run every check against a configuration file
    ///
    /// The file is loaded the same way `chunk --config` loads it, including
    /// `ZHSPLIT_*` environment overrides.
    pub fn check(path: &Path) -> ValidationResult {
        let mut result = ValidationResult::new(path);

        let config = match SplitterConfig::load(Some(path)) {
            Ok(config) => config,
            Err(e) => {
                result.add_error("parse", e.to_string());
                return result;
            }
        };

        if let Err(e) = config.validate() {
            result.add_error("limits", e.to_string());
        }

        // Compiles every separator, catching bad or zero-width patterns
        if result.valid {
            if let Err(e) = RecursiveSplitter::new(config.clone()) {
                result.add_error("separators", e.to_string());
            }
        }

        let mut seen = HashSet::new();
        for separator in &config.separators {
            if !seen.insert(separator.as_str()) {
                result.add_warning("separators", format!("Duplicate separator {:?}", separator));
            }
        }

        if config.chunk_overlap > 0 && config.chunk_overlap == config.chunk_size {
            result.add_warning(
                "limits",
                "chunk_overlap equals chunk_size; merged chunks may repeat entirely".to_string(),
            );
        }

        result.summary = Some(ConfigSummary::from(&config));
        result
    }

    /// Output results in human-readable text format
    fn output_text_results(formatter: &mut OutputFormatter, result: &ValidationResult) -> Result<()> {
        for (category, errors) in &result.errors {
            for error in errors {
                formatter.error(&format!("[{}] {}", category, error))?;
            }
        }

        for (category, warnings) in &result.warnings {
            for warning in warnings {
                formatter.message(&format!("⚠ [{}] {}", category, warning))?;
            }
        }

        if result.valid {
            formatter.success(&format!("Configuration is valid: {}", result.path))?;
            if let Some(summary) = &result.summary {
                formatter.output(summary)?;
            }
        }

        Ok(())
    }
}

/// Key settings of a loaded configuration
#[derive(Debug, Serialize)]
pub struct ConfigSummary {
    pub separators: usize,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub length_unit: String,
    pub fallback: String,
}

impl From<&SplitterConfig> for ConfigSummary {
    fn from(config: &SplitterConfig) -> Self {
        Self {
            separators: config.separators.len(),
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
            length_unit: config.length_unit.to_string(),
            fallback: config.fallback.to_string(),
        }
    }
}

/// Validation result structure
#[derive(Debug, Serialize)]
pub struct ValidationResult {
    pub path: String,
    pub valid: bool,
    pub errors: BTreeMap<String, Vec<String>>,
    pub warnings: BTreeMap<String, Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ConfigSummary>,
}

impl ValidationResult {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.display().to_string(),
            valid: true,
            errors: BTreeMap::new(),
            warnings: BTreeMap::new(),
            summary: None,
        }
    }

    pub fn add_error(&mut self, category: &str, message: String) {
        self.valid = false;
        self.errors
            .entry(category.to_string())
            .or_default()
            .push(message);
    }

    pub fn add_warning(&mut self, category: &str, message: String) {
        self.warnings
            .entry(category.to_string())
            .or_default()
            .push(message);
    }
}
