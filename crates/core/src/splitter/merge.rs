//! Merging of undersized pieces into bounded chunks

use std::collections::VecDeque;
use tracing::warn;

use crate::splitter::sizer::ChunkSizer;

/// Size limits a merger has to honor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeLimits {
    /// Maximum measured size of a merged chunk
    pub chunk_size: usize,
    /// Amount of trailing content repeated at the start of the next chunk
    pub chunk_overlap: usize,
}

/// Combines a run of pieces that each fit into as few chunks as possible
pub trait ChunkMerger: Send + Sync {
    /// Merges `pieces` in order, inserting `separator` between neighbours
    fn merge(
        &self,
        pieces: &[String],
        separator: &str,
        limits: MergeLimits,
        sizer: &dyn ChunkSizer,
    ) -> Vec<String>;
}

/// Greedy window merger with overlap between consecutive chunks
///
/// Pieces are appended to a window until the next one would push it past
/// `chunk_size`. The window is then emitted and pieces are dropped from its
/// front until at most `chunk_overlap` remains, so that remainder starts the
/// next chunk.
#[derive(Debug, Clone)]
pub struct OverlapMerger {
    strip_whitespace: bool,
}

impl OverlapMerger {
    pub fn new(strip_whitespace: bool) -> Self {
        Self { strip_whitespace }
    }

    fn join(&self, window: &VecDeque<&str>, separator: &str) -> Option<String> {
        let joined = window.iter().copied().collect::<Vec<_>>().join(separator);
        let text = if self.strip_whitespace {
            joined.trim().to_string()
        } else {
            joined
        };

        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl Default for OverlapMerger {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ChunkMerger for OverlapMerger {
    fn merge(
        &self,
        pieces: &[String],
        separator: &str,
        limits: MergeLimits,
        sizer: &dyn ChunkSizer,
    ) -> Vec<String> {
        let separator_len = sizer.size(separator);
        let joiner_len = |window: &VecDeque<&str>| {
            if window.is_empty() {
                0
            } else {
                separator_len
            }
        };

        let mut chunks = Vec::new();
        let mut window: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for piece in pieces {
            let len = sizer.size(piece);

            if total + len + joiner_len(&window) > limits.chunk_size {
                if total > limits.chunk_size {
                    warn!(
                        "Created a chunk of size {}, which is longer than the specified {}",
                        total, limits.chunk_size
                    );
                }

                if !window.is_empty() {
                    if let Some(chunk) = self.join(&window, separator) {
                        chunks.push(chunk);
                    }

                    while total > limits.chunk_overlap
                        || (total + len + joiner_len(&window) > limits.chunk_size && total > 0)
                    {
                        let Some(front) = window.pop_front() else {
                            break;
                        };
                        let dropped = sizer.size(front) + joiner_len(&window);
                        total = total.saturating_sub(dropped);
                    }
                }
            }

            window.push_back(piece.as_str());
            total += len + if window.len() > 1 { separator_len } else { 0 };
        }

        if let Some(chunk) = self.join(&window, separator) {
            chunks.push(chunk);
        }

        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::splitter::sizer::CharCounter;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn limits(chunk_size: usize, chunk_overlap: usize) -> MergeLimits {
        MergeLimits {
            chunk_size,
            chunk_overlap,
        }
    }

    #[test]
    fn test_merge_everything_that_fits() {
        let merger = OverlapMerger::default();
        let chunks = merger.merge(&strings(&["a", "b", "c"]), " ", limits(10, 0), &CharCounter);
        assert_eq!(chunks, vec!["a b c"]);
    }

    #[test]
    fn test_merge_without_overlap() {
        let merger = OverlapMerger::default();
        let chunks = merger.merge(
            &strings(&["aa", "bb", "cc", "dd"]),
            " ",
            limits(5, 0),
            &CharCounter,
        );
        assert_eq!(chunks, vec!["aa bb", "cc dd"]);
    }

    #[test]
    fn test_merge_with_overlap() {
        let merger = OverlapMerger::default();
        let chunks = merger.merge(
            &strings(&["aa", "bb", "cc", "dd"]),
            " ",
            limits(5, 2),
            &CharCounter,
        );
        assert_eq!(chunks, vec!["aa bb", "bb cc", "cc dd"]);
    }

    #[test]
    fn test_merge_strips_and_skips_blank_windows() {
        let merger = OverlapMerger::default();
        let chunks = merger.merge(&strings(&["  ", "\n"]), "", limits(10, 0), &CharCounter);
        assert!(chunks.is_empty());

        let chunks = merger.merge(&strings(&[" a ", "b "]), "", limits(10, 0), &CharCounter);
        assert_eq!(chunks, vec!["a b"]);
    }

    #[test]
    fn test_merge_keeps_whitespace_when_not_stripping() {
        let merger = OverlapMerger::new(false);
        let chunks = merger.merge(&strings(&[" a", "b "]), "", limits(10, 0), &CharCounter);
        assert_eq!(chunks, vec![" ab "]);
    }

    #[test]
    fn test_merge_empty_input() {
        let merger = OverlapMerger::default();
        assert!(merger
            .merge(&[], "\n", limits(10, 0), &CharCounter)
            .is_empty());
    }
}
