//! Recursive chunk assembly
//!
//! Splits a span on the best separator, keeps pieces that fit, and recurses
//! into oversized pieces with the finer separators that remain. Runs of
//! fitting pieces are handed to the merge collaborator.
//!
//! # Examples
//!
//! ```
//! use zhsplit_core::config::SplitterConfig;
//! use zhsplit_core::splitter::{RecursiveSplitter, TextSplitter};
//!
//! let config = SplitterConfig {
//!     chunk_size: 6,
//!     chunk_overlap: 0,
//!     ..Default::default()
//! };
//! let splitter = RecursiveSplitter::new(config).unwrap();
//!
//! let chunks = splitter.split_text("短句。这是一个，很长的句子，需要再分。").unwrap();
//! assert_eq!(chunks, vec!["短句。", "这是一个，", "很长的句子，", "需要再分。"]);
//! ```

use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::config::SplitterConfig;
use crate::splitter::error::Result;
use crate::splitter::merge::{ChunkMerger, MergeLimits, OverlapMerger};
use crate::splitter::normalize_chunk;
use crate::splitter::separator::{resolve, Separator, SeparatorList};
use crate::splitter::sizer::ChunkSizer;
use crate::splitter::TextSplitter;

/// Recursive splitter over a prioritized separator list
///
/// Length measurement and merging are injected collaborators; by default they
/// come from the configured [`LengthUnit`](crate::splitter::sizer::LengthUnit)
/// and an [`OverlapMerger`].
#[derive(Clone)]
pub struct RecursiveSplitter {
    config: SplitterConfig,
    separators: SeparatorList,
    sizer: Arc<dyn ChunkSizer>,
    merger: Arc<dyn ChunkMerger>,
}

impl RecursiveSplitter {
    /// Creates a splitter with the default collaborators
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or a separator
    /// pattern does not compile.
    pub fn new(config: SplitterConfig) -> Result<Self> {
        config.validate()?;

        let separators = SeparatorList::compile(&config.separators, config.is_separator_regex)?;
        let sizer = config.length_unit.sizer();
        let merger = Arc::new(OverlapMerger::new(config.strip_whitespace));

        debug!(
            separators = separators.len(),
            chunk_size = config.chunk_size,
            chunk_overlap = config.chunk_overlap,
            keep_separator = config.keep_separator,
            "Created recursive splitter"
        );

        Ok(Self {
            config,
            separators,
            sizer,
            merger,
        })
    }

    /// Replaces the length function
    pub fn with_sizer<S: ChunkSizer + 'static>(mut self, sizer: S) -> Self {
        self.sizer = Arc::new(sizer);
        self
    }

    /// Replaces the merge collaborator
    pub fn with_merger<M: ChunkMerger + 'static>(mut self, merger: M) -> Self {
        self.merger = Arc::new(merger);
        self
    }

    pub fn config(&self) -> &SplitterConfig {
        &self.config
    }

    pub fn separators(&self) -> &SeparatorList {
        &self.separators
    }

    fn limits(&self) -> MergeLimits {
        MergeLimits {
            chunk_size: self.config.chunk_size,
            chunk_overlap: self.config.chunk_overlap,
        }
    }

    fn merge(&self, pieces: &[String], separator: &str) -> Vec<String> {
        self.merger
            .merge(pieces, separator, self.limits(), self.sizer.as_ref())
    }

    /// Splits one span with the given separators
    ///
    /// Each call either recurses with a strictly shorter separator list or
    /// emits oversized pieces verbatim, so depth never exceeds the list length.
    fn split_recursive(
        &self,
        text: &str,
        separators: &[Separator],
        depth: usize,
    ) -> Result<Vec<String>> {
        let resolution = resolve(text, separators, self.config.fallback);
        let pieces = resolution
            .separator
            .split(text, self.config.keep_separator)?;

        debug!(
            depth,
            separator = %resolution.separator,
            pieces = pieces.len(),
            remaining = resolution.remaining.len(),
            "Resolved separator"
        );

        let join_separator = if self.config.keep_separator {
            ""
        } else {
            resolution.separator.join_separator()
        };

        let mut final_chunks = Vec::new();
        let mut good_pieces = Vec::new();

        for piece in pieces {
            if self.sizer.size(&piece) < self.config.chunk_size {
                good_pieces.push(piece);
                continue;
            }

            if !good_pieces.is_empty() {
                final_chunks.extend(self.merge(&good_pieces, join_separator));
                good_pieces.clear();
            }

            if resolution.remaining.is_empty() {
                final_chunks.push(piece);
            } else {
                debug!(depth, size = self.sizer.size(&piece), "Recursing into oversized piece");
                final_chunks.extend(self.split_recursive(&piece, resolution.remaining, depth + 1)?);
            }
        }

        if !good_pieces.is_empty() {
            final_chunks.extend(self.merge(&good_pieces, join_separator));
        }

        Ok(final_chunks
            .iter()
            .filter_map(|chunk| normalize_chunk(chunk))
            .collect())
    }
}

impl TextSplitter for RecursiveSplitter {
    fn split_text(&self, text: &str) -> Result<Vec<String>> {
        let chunks = self.split_recursive(text, self.separators.as_slice(), 0)?;
        debug!(
            input_chars = text.chars().count(),
            chunks = chunks.len(),
            "Split text"
        );
        Ok(chunks)
    }

    fn add_start_index(&self) -> bool {
        self.config.add_start_index
    }
}

impl fmt::Debug for RecursiveSplitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecursiveSplitter")
            .field("config", &self.config)
            .field("separators", &self.separators)
            .finish_non_exhaustive()
    }
}
