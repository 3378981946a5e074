//! Error types for corpus marking.
//!
//! A single [`MarkError`] enum covers the failure modes of the marking
//! pipeline. Marker collisions inside normalized keys are *not* represented
//! here — they are recovered locally by substitution and never surface to
//! the caller.

use thiserror::Error;

/// Convenience result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MarkError>;

/// Errors produced while marking a corpus.
#[derive(Debug, Error)]
pub enum MarkError {
    /// A span's offsets are inconsistent with the line's tokens: out of
    /// bounds, overlapping a neighbor, out of left-to-right order, or
    /// start > end. The whole line is rejected — the marker cannot align
    /// tokens and spans without a consistent geometry.
    #[error("malformed span [{start}, {end}) on line: {reason}")]
    MalformedSpan {
        /// Span start character offset.
        start: usize,
        /// Span end character offset.
        end: usize,
        /// Human-readable description of the inconsistency.
        reason: String,
    },

    /// The injected lemmatizer or normalizer failed for a phrase. The
    /// failure is surfaced per line; fallback policy (e.g. emitting the
    /// literal span text) belongs to the caller.
    #[error("normalization failed for phrase {phrase:?}: {reason}")]
    Normalization {
        /// The phrase being normalized when the failure occurred.
        phrase: String,
        /// Description of the underlying failure.
        reason: String,
    },

    /// The configured marker string is invalid (must be one or two
    /// non-whitespace characters).
    #[error("invalid marker {0:?}: must be 1-2 non-whitespace characters")]
    InvalidMarker(String),

    /// I/O failure while writing marked output or grouping artifacts.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure serializing grouping artifacts.
    #[error("artifact serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl MarkError {
    /// Construct a [`MarkError::MalformedSpan`].
    pub fn malformed_span(start: usize, end: usize, reason: impl Into<String>) -> Self {
        MarkError::MalformedSpan {
            start,
            end,
            reason: reason.into(),
        }
    }

    /// Construct a [`MarkError::Normalization`].
    pub fn normalization(phrase: impl Into<String>, reason: impl Into<String>) -> Self {
        MarkError::Normalization {
            phrase: phrase.into(),
            reason: reason.into(),
        }
    }
}
