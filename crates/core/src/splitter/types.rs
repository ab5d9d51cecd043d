//! Input documents and output chunks

use serde::{Deserialize, Serialize};

/// A named text to be split
///
/// # Examples
///
/// ```
/// use zhsplit_core::splitter::types::Document;
///
/// let document = Document::new("notes.txt", "第一段。\n\n第二段。");
/// assert_eq!(document.source, "notes.txt");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Where the text came from (file path, `<stdin>`, ...)
    pub source: String,

    /// Full text of the document
    pub content: String,
}

impl Document {
    pub fn new<S: Into<String>, C: Into<String>>(source: S, content: C) -> Self {
        Self {
            source: source.into(),
            content: content.into(),
        }
    }
}

/// A final, size-bounded output unit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Normalized chunk text
    pub content: String,

    /// Where the chunk sits within its document
    pub metadata: ChunkMetadata,
}

/// Positional metadata attached to a chunk
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChunkMetadata {
    /// Source of the originating document
    pub source: String,

    /// Index of this chunk within the document (0-based)
    pub chunk_index: usize,

    /// Total number of chunks produced for the document
    pub total_chunks: usize,

    /// Number of characters in the chunk
    pub char_count: usize,

    /// Character offset of the chunk in the original text, when requested
    /// and when the normalized chunk can still be found verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_index: Option<usize>,
}

impl Chunk {
    /// Number of characters in the chunk content
    pub fn len(&self) -> usize {
        self.metadata.char_count
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
