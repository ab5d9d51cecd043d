//! Separator patterns and separator resolution
//!
//! A splitter holds an ordered list of separators, coarsest first. For each
//! text span the resolver picks the first separator that actually occurs in
//! the span and hands back the lower-priority separators for recursion.
//!
//! # Examples
//!
//! ```
//! use zhsplit_core::splitter::separator::{resolve, FallbackMode, SeparatorList};
//!
//! let separators = SeparatorList::compile(&["\n\n", "。|！|？", "，"], true).unwrap();
//! let resolution = resolve("第一句。第二句。", separators.as_slice(), FallbackMode::LastSeparator);
//!
//! assert_eq!(resolution.separator.source(), "。|！|？");
//! assert_eq!(resolution.remaining.len(), 1);
//! ```

use crate::splitter::error::{Result, SplitterError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default separator priority list for mixed Chinese/Latin text
///
/// Ordered from paragraph breaks down to clause separators. All entries are
/// regular expressions.
pub const DEFAULT_SEPARATORS: [&str; 6] = [
    "\n\n",
    "\n",
    "。|！|？",
    r"\.\s|\!\s|\?\s",
    r"；|;\s",
    r"，|,\s",
];

/// Text joining pieces of a dropped regex separator that has metacharacters
pub const PATTERN_JOIN: &str = "\n";

/// Returns [`DEFAULT_SEPARATORS`] as owned strings
pub fn default_separators() -> Vec<String> {
    DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect()
}

/// What to split on when no separator in the list occurs in a span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackMode {
    /// Split on the last separator of the list even though it does not occur
    #[default]
    LastSeparator,
    /// Split the span into individual characters
    Characters,
}

impl fmt::Display for FallbackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LastSeparator => write!(f, "last_separator"),
            Self::Characters => write!(f, "characters"),
        }
    }
}

impl FromStr for FallbackMode {
    type Err = SplitterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "last_separator" | "last" => Ok(Self::LastSeparator),
            "characters" | "chars" => Ok(Self::Characters),
            _ => Err(SplitterError::invalid_configuration(format!(
                "Invalid fallback mode: {}",
                s
            ))),
        }
    }
}

/// A single compiled separator
#[derive(Debug, Clone)]
pub enum Separator {
    /// Plain substring match
    Literal(String),
    /// Regular expression match
    Pattern { source: String, regex: Regex },
    /// The empty pattern: split into individual characters
    Characters,
}

static CHARACTERS: Separator = Separator::Characters;

impl Separator {
    /// Compiles a raw pattern string
    ///
    /// The empty string always becomes [`Separator::Characters`]. Regular
    /// expressions that match the empty string are rejected because they
    /// cannot make forward progress.
    ///
    /// # Errors
    ///
    /// Returns [`SplitterError::InvalidPattern`] for a malformed regex and
    /// [`SplitterError::ZeroWidthPattern`] for a regex matching `""`.
    pub fn compile(raw: &str, is_regex: bool) -> Result<Self> {
        if raw.is_empty() {
            return Ok(Self::Characters);
        }

        if !is_regex {
            return Ok(Self::Literal(raw.to_string()));
        }

        let regex = Regex::new(raw).map_err(|source| SplitterError::InvalidPattern {
            pattern: raw.to_string(),
            source,
        })?;

        if regex.is_match("") {
            return Err(SplitterError::ZeroWidthPattern {
                pattern: raw.to_string(),
            });
        }

        Ok(Self::Pattern {
            source: raw.to_string(),
            regex,
        })
    }

    /// The pattern text this separator was compiled from
    pub fn source(&self) -> &str {
        match self {
            Self::Literal(literal) => literal,
            Self::Pattern { source, .. } => source,
            Self::Characters => "",
        }
    }

    /// Whether the separator occurs anywhere in `text`
    pub fn occurs_in(&self, text: &str) -> bool {
        match self {
            Self::Literal(literal) => text.contains(literal.as_str()),
            Self::Pattern { regex, .. } => regex.is_match(text),
            Self::Characters => true,
        }
    }

    /// Text placed between pieces when they are merged back together
    ///
    /// Only meaningful when separators are dropped. A regex is used verbatim
    /// only if it has no metacharacters; other patterns join with
    /// [`PATTERN_JOIN`] so the boundary survives in the output.
    pub fn join_separator(&self) -> &str {
        match self {
            Self::Literal(literal) => literal,
            Self::Pattern { source, .. } if regex::escape(source) == *source => source,
            Self::Pattern { .. } => PATTERN_JOIN,
            Self::Characters => "",
        }
    }

    /// Splits `text` on this separator
    ///
    /// With `keep_separator` each separator occurrence stays attached to the
    /// piece before it. Empty pieces are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`SplitterError::ZeroWidthMatch`] if the pattern matches an
    /// empty span inside `text`.
    pub fn split(&self, text: &str, keep_separator: bool) -> Result<Vec<String>> {
        let pieces = match self {
            Self::Characters => text.chars().map(String::from).collect(),
            Self::Literal(literal) => {
                let matches = text
                    .match_indices(literal.as_str())
                    .map(|(start, m)| (start, start + m.len()));
                split_at_matches(text, matches, keep_separator)
            }
            Self::Pattern { source, regex } => {
                let mut matches = Vec::new();
                for m in regex.find_iter(text) {
                    if m.start() == m.end() {
                        return Err(SplitterError::ZeroWidthMatch {
                            pattern: source.clone(),
                            offset: m.start(),
                        });
                    }
                    matches.push((m.start(), m.end()));
                }
                split_at_matches(text, matches, keep_separator)
            }
        };

        Ok(pieces.into_iter().filter(|piece| !piece.is_empty()).collect())
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Characters => write!(f, "<characters>"),
            other => write!(f, "{:?}", other.source()),
        }
    }
}

/// Cuts `text` at the given byte ranges
fn split_at_matches(
    text: &str,
    matches: impl IntoIterator<Item = (usize, usize)>,
    keep_separator: bool,
) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut last = 0;

    for (start, end) in matches {
        let piece_end = if keep_separator { end } else { start };
        pieces.push(text[last..piece_end].to_string());
        last = end;
    }

    pieces.push(text[last..].to_string());
    pieces
}

/// An immutable, ordered list of compiled separators
#[derive(Debug, Clone)]
pub struct SeparatorList {
    separators: Vec<Separator>,
}

impl SeparatorList {
    /// Compiles every pattern, in priority order
    ///
    /// # Errors
    ///
    /// Fails on the first pattern that does not compile.
    pub fn compile<S: AsRef<str>>(patterns: &[S], is_regex: bool) -> Result<Self> {
        let separators = patterns
            .iter()
            .map(|pattern| Separator::compile(pattern.as_ref(), is_regex))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { separators })
    }

    /// The default Chinese/Latin list, compiled as regular expressions
    pub fn chinese_default() -> Result<Self> {
        Self::compile(&DEFAULT_SEPARATORS, true)
    }

    pub fn as_slice(&self) -> &[Separator] {
        &self.separators
    }

    pub fn len(&self) -> usize {
        self.separators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.separators.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Separator> {
        self.separators.iter()
    }
}

/// The separator chosen for one span, plus the finer separators left over
#[derive(Debug, Clone, Copy)]
pub struct Resolution<'a> {
    pub separator: &'a Separator,
    pub remaining: &'a [Separator],
}

/// Picks the highest-priority separator that occurs in `text`
///
/// Scanning stops at the first occurring separator, or at an empty pattern,
/// which always applies and leaves nothing to recurse with. When nothing
/// occurs, `fallback` decides between the last listed separator and a
/// character split; either way no separators remain.
pub fn resolve<'a>(
    text: &str,
    separators: &'a [Separator],
    fallback: FallbackMode,
) -> Resolution<'a> {
    for (index, separator) in separators.iter().enumerate() {
        if let Separator::Characters = separator {
            return Resolution {
                separator,
                remaining: &[],
            };
        }

        if separator.occurs_in(text) {
            return Resolution {
                separator,
                remaining: &separators[index + 1..],
            };
        }
    }

    let separator = match fallback {
        FallbackMode::LastSeparator => separators.last().unwrap_or(&CHARACTERS),
        FallbackMode::Characters => &CHARACTERS,
    };

    Resolution {
        separator,
        remaining: &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn regex_list(patterns: &[&str]) -> SeparatorList {
        SeparatorList::compile(patterns, true).unwrap()
    }

    #[test]
    fn test_fallback_mode_parsing() {
        assert_eq!("characters".parse::<FallbackMode>().unwrap(), FallbackMode::Characters);
        assert_eq!(
            "last-separator".parse::<FallbackMode>().unwrap(),
            FallbackMode::LastSeparator
        );
        assert!("words".parse::<FallbackMode>().is_err());
    }

    #[test]
    fn test_default_separators_compile() {
        let list = SeparatorList::chinese_default().unwrap();
        assert_eq!(list.len(), 6);
        assert_eq!(list.as_slice()[0].source(), "\n\n");
        assert_eq!(default_separators().len(), 6);
    }

    #[test]
    fn test_compile_empty_is_characters() {
        assert_matches!(Separator::compile("", true), Ok(Separator::Characters));
        assert_matches!(Separator::compile("", false), Ok(Separator::Characters));
    }

    #[test]
    fn test_compile_literal_is_not_a_regex() {
        let separator = Separator::compile("a.b", false).unwrap();
        assert!(separator.occurs_in("xa.by"));
        assert!(!separator.occurs_in("xaxby"));
    }

    #[test]
    fn test_compile_invalid_regex() {
        assert_matches!(
            Separator::compile("(unclosed", true),
            Err(SplitterError::InvalidPattern { pattern, .. }) if pattern == "(unclosed"
        );
    }

    #[test]
    fn test_compile_rejects_empty_matching_regex() {
        assert_matches!(
            Separator::compile("a*", true),
            Err(SplitterError::ZeroWidthPattern { .. })
        );
    }

    #[test]
    fn test_split_literal_keep_separator() {
        let separator = Separator::compile(",", false).unwrap();
        assert_eq!(
            separator.split("a,b,c", true).unwrap(),
            vec!["a,", "b,", "c"]
        );
        assert_eq!(separator.split(",a", true).unwrap(), vec![",", "a"]);
    }

    #[test]
    fn test_split_literal_drop_separator() {
        let separator = Separator::compile(",", false).unwrap();
        assert_eq!(separator.split("a,b,,c", false).unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_split_pattern_keeps_terminators() {
        let separator = Separator::compile("。|！|？", true).unwrap();
        assert_eq!(
            separator.split("你好！世界。", true).unwrap(),
            vec!["你好！", "世界。"]
        );
        assert_eq!(
            separator.split("你好！世界", false).unwrap(),
            vec!["你好", "世界"]
        );
    }

    #[test]
    fn test_split_half_width_terminator_needs_whitespace() {
        let separator = Separator::compile(r"\.\s|\!\s|\?\s", true).unwrap();
        assert_eq!(
            separator.split("v1.2 is out. Try it! Now", true).unwrap(),
            vec!["v1.2 is out. ", "Try it! ", "Now"]
        );
    }

    #[test]
    fn test_split_characters() {
        assert_eq!(
            Separator::Characters.split("你好a", true).unwrap(),
            vec!["你", "好", "a"]
        );
    }

    #[test]
    fn test_split_zero_width_match_fails_fast() {
        let separator = Separator::compile(r"\b", true).unwrap();
        assert_matches!(
            separator.split("ab cd", true),
            Err(SplitterError::ZeroWidthMatch { offset: 0, .. })
        );
    }

    #[test]
    fn test_join_separator() {
        assert_eq!(Separator::compile("\n\n", false).unwrap().join_separator(), "\n\n");
        assert_eq!(Separator::compile("\n", true).unwrap().join_separator(), "\n");
        assert_eq!(Separator::compile("。|！|？", true).unwrap().join_separator(), "\n");
        assert_eq!(Separator::compile(r"\.\s", true).unwrap().join_separator(), "\n");
        assert_eq!(Separator::Characters.join_separator(), "");
    }

    #[test]
    fn test_resolve_prefers_highest_priority() {
        let list = regex_list(&["\n\n", "。|！|？", ","]);
        let resolution = resolve("A\n\nB。C，D", list.as_slice(), FallbackMode::LastSeparator);

        assert_eq!(resolution.separator.source(), "\n\n");
        assert_eq!(resolution.remaining.len(), 2);
    }

    #[test]
    fn test_resolve_skips_absent_separators() {
        let list = regex_list(&["\n\n", "。|！|？", ","]);
        let resolution = resolve("B。C", list.as_slice(), FallbackMode::LastSeparator);

        assert_eq!(resolution.separator.source(), "。|！|？");
        assert_eq!(resolution.remaining.len(), 1);
        assert_eq!(resolution.remaining[0].source(), ",");
    }

    #[test]
    fn test_resolve_stops_at_empty_pattern() {
        let list = regex_list(&["xyz", "", "b"]);
        let resolution = resolve("abc", list.as_slice(), FallbackMode::LastSeparator);

        assert_matches!(resolution.separator, Separator::Characters);
        assert!(resolution.remaining.is_empty());
    }

    #[test]
    fn test_resolve_falls_back_to_last_separator() {
        let list = regex_list(&["\n\n", "，"]);
        let resolution = resolve("abc", list.as_slice(), FallbackMode::LastSeparator);

        assert_eq!(resolution.separator.source(), "，");
        assert!(resolution.remaining.is_empty());
    }

    #[test]
    fn test_resolve_falls_back_to_characters() {
        let list = regex_list(&["\n\n", "，"]);
        let resolution = resolve("abc", list.as_slice(), FallbackMode::Characters);

        assert_matches!(resolution.separator, Separator::Characters);
        assert!(resolution.remaining.is_empty());
    }

    #[test]
    fn test_resolve_empty_list() {
        let resolution = resolve("abc", &[], FallbackMode::LastSeparator);
        assert_matches!(resolution.separator, Separator::Characters);
    }
}
