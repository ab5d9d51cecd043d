//! Init command implementation

use clap::Args;
use std::path::{Path, PathBuf};
use zhsplit_core::{Result, SplitterConfig, ZhsplitError};

use crate::commands::CliCommand;
use crate::config::{default_config_path, OutputFormat};
use crate::output::OutputFormatter;

/// Write a default splitter configuration file
#[derive(Debug, Clone, Default, Args)]
pub struct InitCommand {
    /// Where to write the file (defaults to the per-user configuration path)
    pub path: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(short, long)]
    pub force: bool,

    /// Output format, set from the global `--output` option
    #[arg(skip)]
    pub output_format: OutputFormat,
}

impl CliCommand for InitCommand {
    async fn execute(&self) -> Result<()> {
        let mut formatter = OutputFormatter::with_format(self.output_format, true);
        self.run(&mut formatter).map(|_| ())
    }

    fn name(&self) -> &'static str {
        "init"
    }
}

impl InitCommand {
    /// Resolve the target path
    pub fn target_path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => default_config_path(),
        }
    }

    /// Write the default configuration and return where it went
    pub fn run(&self, formatter: &mut OutputFormatter) -> Result<PathBuf> {
        let config_path = self.target_path()?;

        if config_path.exists() && !self.force {
            return Err(ZhsplitError::validation(format!(
                "Configuration already exists: {}. Use --force to overwrite.",
                config_path.display()
            )));
        }

        Self::write_config_file(&config_path, &SplitterConfig::default())?;
        tracing::info!("Wrote default configuration to {:?}", config_path);

        if formatter.format().is_machine_readable() {
            formatter.output(&serde_json::json!({
                "path": config_path.display().to_string(),
                "created": true,
            }))?;
        } else {
            formatter.success(&format!(
                "Configuration written to: {}",
                config_path.display()
            ))?;
            formatter.message(&format!(
                "Run 'zhsplit validate {}' after editing it",
                config_path.display()
            ))?;
        }

        Ok(config_path)
    }

    fn write_config_file(config_path: &Path, config: &SplitterConfig) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        config.to_file(config_path)
    }
}
