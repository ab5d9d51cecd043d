//! Length functions used to decide whether a piece fits a chunk

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use unicode_segmentation::UnicodeSegmentation;

use crate::splitter::error::SplitterError;

/// Measures the size of a candidate piece or chunk
///
/// Implemented for any `Fn(&str) -> usize`, so a closure can be passed
/// wherever a sizer is expected.
pub trait ChunkSizer: Send + Sync {
    fn size(&self, text: &str) -> usize;
}

impl<F> ChunkSizer for F
where
    F: Fn(&str) -> usize + Send + Sync,
{
    fn size(&self, text: &str) -> usize {
        self(text)
    }
}

/// Counts Unicode scalar values
#[derive(Debug, Clone, Copy, Default)]
pub struct CharCounter;

impl ChunkSizer for CharCounter {
    fn size(&self, text: &str) -> usize {
        text.chars().count()
    }
}

/// Counts UTF-8 bytes
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteCounter;

impl ChunkSizer for ByteCounter {
    fn size(&self, text: &str) -> usize {
        text.len()
    }
}

/// Counts extended grapheme clusters
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphemeCounter;

impl ChunkSizer for GraphemeCounter {
    fn size(&self, text: &str) -> usize {
        text.graphemes(true).count()
    }
}

/// Rough token estimate for mixed CJK/Latin text
///
/// Each CJK character counts as one token; everything else is estimated at
/// about four characters per token.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenEstimator;

impl ChunkSizer for TokenEstimator {
    fn size(&self, text: &str) -> usize {
        let (cjk, other) = text.chars().fold((0usize, 0usize), |(cjk, other), ch| {
            if is_cjk(ch) {
                (cjk + 1, other)
            } else {
                (cjk, other + 1)
            }
        });

        cjk + (other + 3) / 4
    }
}

fn is_cjk(ch: char) -> bool {
    matches!(ch,
        '\u{3000}'..='\u{303F}'
        | '\u{3400}'..='\u{4DBF}'
        | '\u{4E00}'..='\u{9FFF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{FF00}'..='\u{FFEF}'
        | '\u{20000}'..='\u{2A6DF}')
}

/// Length unit selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    #[default]
    Chars,
    Bytes,
    Graphemes,
    Tokens,
}

impl LengthUnit {
    /// The built-in sizer for this unit
    pub fn sizer(self) -> Arc<dyn ChunkSizer> {
        match self {
            Self::Chars => Arc::new(CharCounter),
            Self::Bytes => Arc::new(ByteCounter),
            Self::Graphemes => Arc::new(GraphemeCounter),
            Self::Tokens => Arc::new(TokenEstimator),
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chars => write!(f, "chars"),
            Self::Bytes => write!(f, "bytes"),
            Self::Graphemes => write!(f, "graphemes"),
            Self::Tokens => write!(f, "tokens"),
        }
    }
}

impl FromStr for LengthUnit {
    type Err = SplitterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chars" | "characters" => Ok(Self::Chars),
            "bytes" => Ok(Self::Bytes),
            "graphemes" => Ok(Self::Graphemes),
            "tokens" => Ok(Self::Tokens),
            _ => Err(SplitterError::invalid_configuration(format!(
                "Invalid length unit: {}",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_and_byte_counts() {
        assert_eq!(CharCounter.size("你好ab"), 4);
        assert_eq!(ByteCounter.size("你好ab"), 8);
        assert_eq!(CharCounter.size(""), 0);
    }

    #[test]
    fn test_grapheme_count() {
        let text = "e\u{301}x";
        assert_eq!(CharCounter.size(text), 3);
        assert_eq!(GraphemeCounter.size(text), 2);
    }

    #[test]
    fn test_token_estimate() {
        assert_eq!(TokenEstimator.size(""), 0);
        assert_eq!(TokenEstimator.size("你好"), 2);
        assert_eq!(TokenEstimator.size("hello world"), 3);
        assert_eq!(TokenEstimator.size("你好abcd"), 3);
        assert_eq!(TokenEstimator.size("。，"), 2);
    }

    #[test]
    fn test_closure_sizer() {
        let sizer = |text: &str| text.split_whitespace().count();
        assert_eq!(sizer.size("one two three"), 3);
    }

    #[test]
    fn test_length_unit_parsing() {
        assert_eq!("chars".parse::<LengthUnit>().unwrap(), LengthUnit::Chars);
        assert_eq!("Tokens".parse::<LengthUnit>().unwrap(), LengthUnit::Tokens);
        assert!("words".parse::<LengthUnit>().is_err());
        assert_eq!(LengthUnit::Graphemes.to_string(), "graphemes");
    }

    #[test]
    fn test_length_unit_sizer() {
        assert_eq!(LengthUnit::Bytes.sizer().size("你"), 3);
        assert_eq!(LengthUnit::default().sizer().size("你"), 1);
    }
}
