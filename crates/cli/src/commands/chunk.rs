//! CLI command for splitting text into chunks
//!
//! Reads files, directories of `.txt`/`.md` files, or standard input and
//! prints the chunks produced by the recursive splitter.
//!
//! # Examples
//!
//! ```bash
//! # Chunk a single document with the default Chinese separators
//! zhsplit chunk notes.txt
//!
//! # Chunk every text file under a directory as JSON
//! zhsplit --output json chunk docs/
//!
//! # Read from stdin with custom separators
//! cat article.txt | zhsplit chunk --chunk-size 100 --separator '\n\n' --separator '。'
//! ```

use crate::commands::CliCommand;
use crate::config::{load_splitter_config, OutputFormat};
use crate::output::OutputFormatter;

use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};
use walkdir::WalkDir;
use zhsplit_core::{
    Chunk, Document, FallbackMode, LengthUnit, RecursiveSplitter, Result, SplitterConfig,
    TextSplitter, ZhsplitError,
};

/// File extensions picked up when walking a directory
const TEXT_EXTENSIONS: &[&str] = &["txt", "md", "markdown"];

/// Source name used for text read from standard input
pub const STDIN_SOURCE: &str = "<stdin>";

/// Arguments for the chunk command
///
/// Every option overrides the value from the configuration file.
#[derive(Debug, Clone, Default, Args)]
pub struct ChunkArgs {
    /// Input file(s) or directories to process
    ///
    /// Directories are walked recursively for .txt and .md files.
    /// Standard input is read when no input is given.
    pub input: Vec<PathBuf>,

    /// Maximum chunk size, in the configured length unit
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Overlap between consecutive merged chunks
    #[arg(long)]
    pub chunk_overlap: Option<usize>,

    /// Separator to split on, highest priority first (repeatable)
    ///
    /// Replaces the configured separator list. An empty separator splits
    /// into single characters.
    #[arg(short, long = "separator", value_name = "PATTERN")]
    pub separators: Vec<String>,

    /// Treat separators as literal text instead of regular expressions
    #[arg(long)]
    pub literal: bool,

    /// Drop separators instead of keeping them attached to the preceding text
    #[arg(long)]
    pub drop_separator: bool,

    /// How chunk sizes are measured (chars, bytes, graphemes, tokens)
    #[arg(long, value_name = "UNIT")]
    pub length_unit: Option<LengthUnit>,

    /// What to split on when no separator occurs (last_separator, characters)
    #[arg(long, value_name = "MODE")]
    pub fallback: Option<FallbackMode>,

    /// Record each chunk's character offset in its document
    #[arg(long)]
    pub start_index: bool,

    /// Configuration file, set from the global `--config` option
    #[arg(skip)]
    pub config_path: Option<PathBuf>,

    /// Output format, set from the global `--output` option
    #[arg(skip)]
    pub output_format: OutputFormat,
}

/// Chunks produced for one input document
#[derive(Debug, Clone, Serialize)]
pub struct ChunkReport {
    pub source: String,
    pub chunk_count: usize,
    pub chunks: Vec<Chunk>,
}

impl ChunkReport {
    pub fn new(source: String, chunks: Vec<Chunk>) -> Self {
        Self {
            source,
            chunk_count: chunks.len(),
            chunks,
        }
    }
}

/// One line of table output
#[derive(Debug, Serialize)]
struct ChunkRow<'a> {
    source: &'a str,
    index: usize,
    chars: usize,
    start: Option<usize>,
    content: &'a str,
}

impl ChunkArgs {
    /// Validate command arguments
    pub fn validate(&self) -> Result<()> {
        for path in &self.input {
            if !path.exists() {
                return Err(ZhsplitError::not_found(format!(
                    "Input not found: {}",
                    path.display()
                )));
            }
        }

        if self.chunk_size == Some(0) {
            return Err(ZhsplitError::validation("chunk size must be greater than 0"));
        }

        if let (Some(size), Some(overlap)) = (self.chunk_size, self.chunk_overlap) {
            if overlap > size {
                return Err(ZhsplitError::validation(format!(
                    "chunk overlap ({}) must not be larger than chunk size ({})",
                    overlap, size
                )));
            }
        }

        Ok(())
    }

    /// Build the splitter configuration: config file and environment, then arguments
    pub fn build_config(&self) -> Result<SplitterConfig> {
        let mut config = load_splitter_config(self.config_path.as_deref())?;

        if let Some(chunk_size) = self.chunk_size {
            config.chunk_size = chunk_size;
        }

        if let Some(chunk_overlap) = self.chunk_overlap {
            config.chunk_overlap = chunk_overlap;
        }

        if !self.separators.is_empty() {
            config.separators = self.separators.clone();
        }

        if self.literal {
            config.is_separator_regex = false;
        }

        if self.drop_separator {
            config.keep_separator = false;
        }

        if let Some(length_unit) = self.length_unit {
            config.length_unit = length_unit;
        }

        if let Some(fallback) = self.fallback {
            config.fallback = fallback;
        }

        if self.start_index {
            config.add_start_index = true;
        }

        config.validate()?;
        Ok(config)
    }

    /// Split all inputs and write the result through `formatter`
    pub async fn run(&self, formatter: &mut OutputFormatter) -> Result<Vec<ChunkReport>> {
        let config = self.build_config()?;
        debug!(
            chunk_size = config.chunk_size,
            chunk_overlap = config.chunk_overlap,
            length_unit = %config.length_unit,
            "Chunking configuration"
        );

        let splitter = Arc::new(RecursiveSplitter::new(config)?);
        let documents = self.collect_documents().await?;

        let handles: Vec<_> = documents
            .into_iter()
            .map(|document| {
                let splitter = Arc::clone(&splitter);
                tokio::task::spawn_blocking(move || {
                    let chunks = splitter.split_documents(std::slice::from_ref(&document))?;
                    Ok::<_, ZhsplitError>(ChunkReport::new(document.source, chunks))
                })
            })
            .collect();

        let mut reports = Vec::with_capacity(handles.len());
        for handle in handles {
            let report = handle.await.map_err(|e| {
                ZhsplitError::Generic(anyhow::anyhow!("Chunking task failed: {}", e))
            })??;
            debug!("Split {} into {} chunks", report.source, report.chunk_count);
            reports.push(report);
        }

        match formatter.format() {
            OutputFormat::Table => formatter.output(&Self::rows(&reports))?,
            OutputFormat::Compact => {
                for chunk in reports.iter().flat_map(|report| &report.chunks) {
                    formatter.output(chunk)?;
                }
            }
            _ => formatter.output(&reports)?,
        }

        info!(
            "Produced {} chunks from {} inputs",
            reports.iter().map(|r| r.chunk_count).sum::<usize>(),
            reports.len()
        );

        Ok(reports)
    }

    fn rows(reports: &[ChunkReport]) -> Vec<ChunkRow<'_>> {
        reports
            .iter()
            .flat_map(|report| &report.chunks)
            .map(|chunk| ChunkRow {
                source: &chunk.metadata.source,
                index: chunk.metadata.chunk_index,
                chars: chunk.metadata.char_count,
                start: chunk.metadata.start_index,
                content: &chunk.content,
            })
            .collect()
    }

    /// Read every input into a document, or standard input when there is none
    async fn collect_documents(&self) -> Result<Vec<Document>> {
        if self.input.is_empty() {
            debug!("Reading text from standard input");
            let mut content = String::new();
            tokio::io::stdin().read_to_string(&mut content).await?;
            return Ok(vec![Document::new(STDIN_SOURCE, content)]);
        }

        let mut documents = Vec::new();
        for path in self.collect_files()? {
            let content = tokio::fs::read_to_string(&path).await?;
            documents.push(Document::new(path.display().to_string(), content));
        }

        Ok(documents)
    }

    /// Collect all files to process
    ///
    /// Expands directories and filters for text file types.
    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for path in &self.input {
            if path.is_file() {
                files.push(path.clone());
            } else if path.is_dir() {
                files.extend(Self::find_text_files(path)?);
            } else {
                return Err(ZhsplitError::not_found(format!(
                    "Input not found: {}",
                    path.display()
                )));
            }
        }

        if files.is_empty() {
            return Err(ZhsplitError::validation("No text files found to process"));
        }

        info!("Found {} files to process", files.len());
        Ok(files)
    }

    /// Find all text files under a directory, in file name order
    fn find_text_files(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(std::io::Error::from)?;
            if entry.file_type().is_file() && Self::is_text_file(entry.path()) {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }

    fn is_text_file(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| TEXT_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
            .unwrap_or(false)
    }
}

impl CliCommand for ChunkArgs {
    async fn execute(&self) -> Result<()> {
        let mut formatter = OutputFormatter::with_format(self.output_format, true);
        self.run(&mut formatter).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "chunk"
    }

    fn validate(&self) -> Result<()> {
        self.validate()
    }
}
