//! zhsplit - Recursive text splitter for mixed Chinese/Latin text
//!
//! Splits documents into bounded-size chunks using a prioritized list of
//! separators, from paragraph breaks down to clause punctuation, for
//! embedding and indexing pipelines.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, error};
use zhsplit_cli::{ChunkArgs, InitCommand, LogLevel, OutputFormat, ValidateCommand};
use zhsplit_core::Result;

#[derive(Parser)]
#[command(name = "zhsplit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Recursive text splitter tuned for Chinese and Latin punctuation")]
#[command(long_about = r#"
zhsplit breaks text into chunks no larger than a configured size. It splits on
paragraph breaks first, then line breaks, sentence terminators (。！？ . ! ?),
semicolons and commas, recursing into pieces that are still too large.

Settings come from built-in defaults, then the configuration file, then
ZHSPLIT_* environment variables, then command-line options.
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format (json, yaml, pretty, compact, table)
    #[arg(short, long, default_value = "pretty", global = true)]
    output: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Split files, directories or stdin into chunks
    Chunk(ChunkArgs),

    /// Write a default configuration file
    Init(InitCommand),

    /// Validate a configuration file
    Validate(ValidateCommand),

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() {
    zhsplit_cli::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!(category = e.category(), "{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(zhsplit_cli::exit_code_for_error(&e));
    }
}

async fn run(cli: Cli) -> Result<()> {
    let output_format: OutputFormat = cli.output.parse()?;

    // Logs go to stderr; keep them structured when stdout is machine-readable
    let log_level = LogLevel::from_verbose(cli.verbose);
    let log_format = if output_format == OutputFormat::Json {
        "json"
    } else {
        "compact"
    };
    zhsplit_core::init_logging_with_config(&log_level.to_string(), log_format)?;

    debug!("Starting zhsplit v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Chunk(mut args) => {
            args.config_path = cli.config;
            args.output_format = output_format;
            zhsplit_cli::execute_command(args).await
        }

        Commands::Init(mut command) => {
            if command.path.is_none() {
                command.path = cli.config;
            }
            command.output_format = output_format;
            zhsplit_cli::execute_command(command).await
        }

        Commands::Validate(mut command) => {
            command.output_format = output_format;
            zhsplit_cli::execute_command(command).await
        }

        Commands::Version => handle_version(output_format),
    }
}

fn handle_version(output_format: OutputFormat) -> Result<()> {
    if output_format.is_machine_readable() {
        let info = serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "core": zhsplit_core::VERSION,
        });
        zhsplit_cli::OutputFormatter::with_format(output_format, false).output(&info)?;
    } else {
        println!("{}", zhsplit_core::version_info());
    }
    Ok(())
}
