//! Core types for npmark
//!
//! This module defines the data structures exchanged with the external
//! parser (tokens and noun-phrase spans) and the marker configuration.

use crate::errors::{MarkError, Result};
use serde::{Deserialize, Serialize};

/// Lemma placeholder the upstream parser emits for pronouns.
///
/// Spans carrying this lemma are never marked or grouped — they pass
/// through as literal text.
pub const PRON_LEMMA: &str = "-PRON-";

/// Default marker string (word separator and phrase suffix).
pub const DEFAULT_MARKER: &str = "_";

// ============================================================================
// Token
// ============================================================================

/// A token produced by the external parser for one line.
///
/// Tokens are ordered by `start`, non-overlapping, and whitespace-separated.
/// `end` is always `start + text.len()` in character terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The surface form (original text).
    pub text: String,
    /// Character offset (start) in the line.
    pub start: usize,
    /// Character offset (end, exclusive) in the line.
    pub end: usize,
}

impl Token {
    /// Create a new token.
    pub fn new(text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }

    /// Whether the token consists entirely of whitespace.
    ///
    /// Whitespace tokens are never emitted into the marked output.
    pub fn is_whitespace(&self) -> bool {
        self.text.trim().is_empty()
    }
}

// ============================================================================
// Span
// ============================================================================

/// A noun-phrase span over a line, identified by the external parser.
///
/// The half-open character range `[start, end)` covers one or more tokens.
/// Spans arrive non-overlapping and in left-to-right order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Start character offset.
    pub start: usize,
    /// End character offset (exclusive).
    pub end: usize,
    /// The literal span text.
    pub text: String,
    /// The lemmatized form supplied by the parser.
    pub lemma: String,
}

impl Span {
    /// Create a new span.
    pub fn new(
        start: usize,
        end: usize,
        text: impl Into<String>,
        lemma: impl Into<String>,
    ) -> Self {
        Self {
            start,
            end,
            text: text.into(),
            lemma: lemma.into(),
        }
    }

    /// Whether this span should be marked at all.
    ///
    /// Spans of literal length <= 1 character, or whose lemma is the
    /// pronoun placeholder, are emitted verbatim instead.
    pub fn is_markable(&self) -> bool {
        self.text.chars().count() > 1 && self.lemma != PRON_LEMMA
    }

    /// Check if this span overlaps another.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

// ============================================================================
// ParsedLine
// ============================================================================

/// One input line as produced by a [`Segmenter`](crate::corpus::Segmenter):
/// an ordered token list and an ordered, non-overlapping span list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedLine {
    /// Tokens in left-to-right order.
    pub tokens: Vec<Token>,
    /// Noun-phrase spans in left-to-right order.
    pub spans: Vec<Span>,
}

impl ParsedLine {
    /// Create a parsed line from tokens and spans.
    pub fn new(tokens: Vec<Token>, spans: Vec<Span>) -> Self {
        Self { tokens, spans }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for span marking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerConfig {
    /// Marker string substituted for internal whitespace and appended after
    /// each collapsed phrase (1-2 non-whitespace characters, default `_`).
    pub marker: String,
    /// Whether to canonicalize phrase variants into frequency-chosen
    /// representatives instead of marking each literally.
    pub grouping: bool,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            grouping: false,
        }
    }
}

impl MarkerConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        let len = self.marker.chars().count();
        if !(1..=2).contains(&len) || self.marker.chars().any(char::is_whitespace) {
            return Err(MarkError::InvalidMarker(self.marker.clone()));
        }
        Ok(())
    }

    /// Builder method: set the marker string.
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Builder method: enable or disable grouping mode.
    pub fn with_grouping(mut self, grouping: bool) -> Self {
        self.grouping = grouping;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_whitespace() {
        assert!(Token::new("  ", 0, 2).is_whitespace());
        assert!(Token::new("", 0, 0).is_whitespace());
        assert!(!Token::new("word", 0, 4).is_whitespace());
    }

    #[test]
    fn test_span_markable() {
        assert!(Span::new(0, 14, "climate change", "climate change").is_markable());
        // Single character: never marked.
        assert!(!Span::new(0, 1, "I", "I").is_markable());
        // Pronoun lemma: never marked.
        assert!(!Span::new(0, 4, "they", PRON_LEMMA).is_markable());
    }

    #[test]
    fn test_span_overlap() {
        let a = Span::new(0, 10, "a", "a");
        let b = Span::new(5, 15, "b", "b");
        let c = Span::new(10, 20, "c", "c");
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c)); // adjacent, not overlapping
    }

    #[test]
    fn test_config_default() {
        let cfg = MarkerConfig::default();
        assert_eq!(cfg.marker, "_");
        assert!(!cfg.grouping);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_config_marker_length() {
        assert!(MarkerConfig::new().with_marker("__").validate().is_ok());
        assert!(MarkerConfig::new().with_marker("").validate().is_err());
        assert!(MarkerConfig::new().with_marker("___").validate().is_err());
        assert!(MarkerConfig::new().with_marker(" ").validate().is_err());
    }

    #[test]
    fn test_config_builders() {
        let cfg = MarkerConfig::new().with_marker("~").with_grouping(true);
        assert_eq!(cfg.marker, "~");
        assert!(cfg.grouping);
    }
}
