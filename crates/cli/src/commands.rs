//! CLI commands module

use zhsplit_core::Result;

pub mod chunk;
pub mod init;
pub mod validate;

pub use chunk::*;
pub use init::*;
pub use validate::*;

/// Base trait for CLI commands
#[allow(async_fn_in_trait)]
pub trait CliCommand {
    /// Execute the command
    async fn execute(&self) -> Result<()>;

    /// Get command name for logging
    fn name(&self) -> &'static str;

    /// Validate command arguments
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Common command execution wrapper
pub async fn execute_command<T: CliCommand>(command: T) -> Result<()> {
    tracing::debug!("Executing command: {}", command.name());

    command.validate()?;
    command.execute().await?;

    tracing::debug!("Command {} completed successfully", command.name());
    Ok(())
}
