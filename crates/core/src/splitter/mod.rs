//! Recursive text splitting for mixed Chinese/Latin text
//!
//! Text is split on a prioritized list of separators, coarsest first
//! (paragraph breaks, line breaks, sentence terminators, clause separators).
//! Pieces that still exceed the chunk size are split again with the finer
//! separators; pieces that fit are merged back into bounded chunks.
//!
//! # Components
//!
//! - [`separator`] - Separator patterns and resolution
//! - [`recursive`] - The recursive assembler ([`RecursiveSplitter`])
//! - [`sizer`] - Length functions
//! - [`merge`] - Merging of small pieces with overlap
//! - [`types`] - Documents and chunks
//!
//! # Examples
//!
//! ```
//! use zhsplit_core::config::SplitterConfig;
//! use zhsplit_core::splitter::{RecursiveSplitter, TextSplitter};
//!
//! let splitter = RecursiveSplitter::new(SplitterConfig::default()).unwrap();
//! let chunks = splitter.split_text("第一段。\n\n第二段。").unwrap();
//!
//! assert_eq!(chunks, vec!["第一段。\n第二段。"]);
//! ```

pub mod error;
pub mod merge;
pub mod recursive;
pub mod separator;
pub mod sizer;
pub mod types;

use once_cell::sync::Lazy;
use regex::Regex;

pub use error::SplitterError;
pub use merge::{ChunkMerger, MergeLimits, OverlapMerger};
pub use recursive::RecursiveSplitter;
pub use separator::{FallbackMode, Separator, SeparatorList, DEFAULT_SEPARATORS};
pub use sizer::{ChunkSizer, LengthUnit};
pub use types::{Chunk, ChunkMetadata, Document};

/// Runs of two or more newlines
static BLANK_LINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{2,}").expect("Failed to compile blank line pattern regex"));

/// Normalizes a chunk for output
///
/// Trims surrounding whitespace and collapses runs of newlines into one.
/// Returns `None` when nothing is left.
///
/// # Examples
///
/// ```
/// use zhsplit_core::splitter::normalize_chunk;
///
/// assert_eq!(normalize_chunk("  a\n\n\nb \n"), Some("a\nb".to_string()));
/// assert_eq!(normalize_chunk(" \n "), None);
/// ```
pub fn normalize_chunk(chunk: &str) -> Option<String> {
    let trimmed = chunk.trim();
    if trimmed.is_empty() {
        return None;
    }

    Some(BLANK_LINES.replace_all(trimmed, "\n").into_owned())
}

/// A splitter that turns text into ordered chunks
pub trait TextSplitter {
    /// Splits `text` into normalized chunks, in original order
    fn split_text(&self, text: &str) -> error::Result<Vec<String>>;

    /// Whether [`split_documents`](TextSplitter::split_documents) records start offsets
    fn add_start_index(&self) -> bool {
        false
    }

    /// Splits each document and attaches positional metadata to its chunks
    ///
    /// Start offsets are character offsets found by searching forward from
    /// the previous chunk's start; a chunk changed by normalization may not
    /// be found, in which case its offset is `None`.
    fn split_documents(&self, documents: &[Document]) -> error::Result<Vec<Chunk>> {
        let mut chunks = Vec::new();

        for document in documents {
            let texts = self.split_text(&document.content)?;
            let total_chunks = texts.len();
            // Byte position of the search and its char offset in the document
            let mut cursor = 0;
            let mut cursor_chars = 0;

            for (chunk_index, content) in texts.into_iter().enumerate() {
                let start_index = if self.add_start_index() {
                    let rest = document.content.get(cursor..).unwrap_or_default();

                    rest.find(content.as_str()).map(|offset| {
                        let start = cursor_chars + rest[..offset].chars().count();
                        match content.chars().next() {
                            Some(first) => {
                                cursor += offset + first.len_utf8();
                                cursor_chars = start + 1;
                            }
                            None => {
                                cursor += offset;
                                cursor_chars = start;
                            }
                        }
                        start
                    })
                } else {
                    None
                };

                chunks.push(Chunk {
                    metadata: ChunkMetadata {
                        source: document.source.clone(),
                        chunk_index,
                        total_chunks,
                        char_count: content.chars().count(),
                        start_index,
                    },
                    content,
                });
            }
        }

        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SplitterConfig;

    #[test]
    fn test_normalize_chunk() {
        assert_eq!(normalize_chunk("a\n\nb"), Some("a\nb".to_string()));
        assert_eq!(normalize_chunk("\n\na\n \nb\n\n"), Some("a\n \nb".to_string()));
        assert_eq!(normalize_chunk(""), None);
        assert_eq!(normalize_chunk("\t\n"), None);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for input in ["  a\n\n\nb ", "x", "一\n\n\n\n二\n三", "\n\n  段落  \n\n"] {
            let once = normalize_chunk(input).unwrap();
            assert_eq!(normalize_chunk(&once), Some(once.clone()));
        }
    }

    #[test]
    fn test_split_documents_metadata() {
        let splitter = RecursiveSplitter::new(SplitterConfig {
            separators: vec!["。".to_string()],
            chunk_size: 4,
            chunk_overlap: 0,
            add_start_index: true,
            ..Default::default()
        })
        .unwrap();

        let documents = vec![
            Document::new("a.txt", "一二三。四五六。"),
            Document::new("b.txt", "七八。"),
        ];
        let chunks = splitter.split_documents(&documents).unwrap();

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].content, "一二三。");
        assert_eq!(chunks[0].metadata.start_index, Some(0));
        assert_eq!(chunks[1].content, "四五六。");
        assert_eq!(chunks[1].metadata.start_index, Some(4));
        assert_eq!(chunks[1].metadata.total_chunks, 2);
        assert_eq!(chunks[1].metadata.char_count, 4);

        assert_eq!(chunks[2].metadata.source, "b.txt");
        assert_eq!(chunks[2].metadata.chunk_index, 0);
        assert_eq!(chunks[2].metadata.total_chunks, 1);
    }

    #[test]
    fn test_split_documents_without_start_index() {
        let splitter = RecursiveSplitter::new(SplitterConfig::default()).unwrap();
        let chunks = splitter
            .split_documents(&[Document::new("<stdin>", "你好。")])
            .unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].metadata.start_index, None);
    }

    #[test]
    fn test_start_index_with_repeated_chunks() {
        let splitter = RecursiveSplitter::new(SplitterConfig {
            separators: vec!["。".to_string()],
            chunk_size: 3,
            chunk_overlap: 0,
            add_start_index: true,
            ..Default::default()
        })
        .unwrap();

        let chunks = splitter
            .split_documents(&[Document::new("dup", "好的。好的。")])
            .unwrap();

        let starts: Vec<_> = chunks.iter().map(|c| c.metadata.start_index).collect();
        assert_eq!(starts, vec![Some(0), Some(3)]);
    }

    #[test]
    fn test_start_index_over_long_mixed_width_document() {
        let splitter = RecursiveSplitter::new(SplitterConfig {
            separators: vec!["，".to_string()],
            chunk_size: 8,
            chunk_overlap: 3,
            add_start_index: true,
            ..Default::default()
        })
        .unwrap();

        let content = "ab，一二，cd，三四，".repeat(200);
        let chunks = splitter
            .split_documents(&[Document::new("long", content.as_str())])
            .unwrap();
        let chars: Vec<char> = content.chars().collect();

        assert!(chunks.len() > 100);
        let mut previous = None;
        for chunk in &chunks {
            let start = chunk.metadata.start_index.unwrap();
            let found: String = chars[start..start + chunk.len()].iter().collect();
            assert_eq!(found, chunk.content);
            assert!(previous < Some(start));
            previous = Some(start);
        }
    }
}
