//! Per-line span marking state machine
//!
//! Walks one line's tokens and noun-phrase spans in lock-step: tokens
//! outside any span are emitted verbatim, each span is collapsed into a
//! single marker-suffixed token the first time one of its tokens is
//! reached, and the span cursor advances when a token's end offset lines
//! up with the span's end offset.
//!
//! Per line the machine is in one of three states — no active span, active
//! span pending write, active span written — driven purely by offset
//! comparisons, so a full pass is O(tokens + spans).

use crate::errors::{MarkError, Result};
use crate::grouping::GroupingTable;
use crate::normalize::Normalizer;
use crate::types::{MarkerConfig, Span, Token};

// ============================================================================
// LineReport
// ============================================================================

/// Statistics for one marked line, returned to the caller after each line
/// so external code can track progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineReport {
    /// Tokens emitted verbatim (outside any span).
    pub tokens_emitted: usize,
    /// Spans collapsed into marked tokens.
    pub spans_marked: usize,
    /// Spans emitted as literal text (length <= 1 or pronoun lemma).
    pub spans_passed_through: usize,
}

// ============================================================================
// SpanMarker
// ============================================================================

/// The span marker: collapses noun-phrase spans into single tokens.
///
/// Holds the marker configuration and the injected [`Normalizer`]. The
/// normalizer is only consulted in grouping mode, when spans are encoded by
/// normalized key instead of literal text.
#[derive(Debug)]
pub struct SpanMarker<N> {
    normalizer: N,
    config: MarkerConfig,
}

impl<N: Normalizer> SpanMarker<N> {
    /// Create a marker with the default configuration (`_`, grouping off).
    pub fn new(normalizer: N) -> Self {
        Self {
            normalizer,
            config: MarkerConfig::default(),
        }
    }

    /// Create a marker with a custom configuration.
    ///
    /// Fails if the marker string is not 1-2 non-whitespace characters.
    pub fn with_config(normalizer: N, config: MarkerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { normalizer, config })
    }

    /// The active configuration.
    pub fn config(&self) -> &MarkerConfig {
        &self.config
    }

    /// Mark one line, appending the output (including the terminating
    /// newline) to `out`.
    ///
    /// `grouping` enables grouping mode: pass the caller-owned table to
    /// canonicalize spans by normalized key, or `None` to encode literal
    /// span text. The line either fully succeeds or `out` is left exactly
    /// as it was — no partial output survives an error.
    pub fn mark_line(
        &self,
        tokens: &[Token],
        spans: &[Span],
        grouping: Option<&mut GroupingTable>,
        out: &mut String,
    ) -> Result<LineReport> {
        validate_spans(tokens, spans)?;

        let checkpoint = out.len();
        let mut report = LineReport::default();
        match self.mark_line_inner(tokens, spans, grouping, out, checkpoint, &mut report) {
            Ok(()) => {
                out.push('\n');
                Ok(report)
            }
            Err(err) => {
                out.truncate(checkpoint);
                Err(err)
            }
        }
    }

    fn mark_line_inner(
        &self,
        tokens: &[Token],
        spans: &[Span],
        mut grouping: Option<&mut GroupingTable>,
        out: &mut String,
        line_start: usize,
        report: &mut LineReport,
    ) -> Result<()> {
        let mut span_iter = spans.iter();
        let mut active = span_iter.next();
        let mut span_written = false;

        for token in tokens {
            // Drop spans that end at or before this token: they cover no
            // remaining tokens (zero-length spans included) and must not
            // block the spans that follow.
            while let Some(span) = active {
                if span.end <= token.start {
                    active = span_iter.next();
                    span_written = false;
                } else {
                    break;
                }
            }

            let span = match active {
                None => {
                    emit_verbatim(out, token, line_start, report);
                    continue;
                }
                Some(span) => span,
            };

            if token.start < span.start || token.start >= span.end {
                // Outside the active span.
                emit_verbatim(out, token, line_start, report);
                continue;
            }

            // Inside the active span: the span text is written once, on the
            // first covered token; the remaining covered tokens only drive
            // the cursor.
            if !span_written {
                if span.is_markable() {
                    let marked = match grouping.as_deref_mut() {
                        Some(table) => self.group_and_encode(span, table)?,
                        None => collapse_whitespace(&span.text, &self.config.marker),
                    };
                    push_word(out, &marked, line_start);
                    report.spans_marked += 1;
                } else {
                    push_word(out, &span.text, line_start);
                    report.spans_passed_through += 1;
                }
                span_written = true;
            }

            if token.end == span.end {
                active = span_iter.next();
                span_written = false;
            }
        }

        Ok(())
    }

    /// Grouping-mode encoding: record the span in the table and emit its
    /// normalized key in marker encoding.
    fn group_and_encode(&self, span: &Span, table: &mut GroupingTable) -> Result<String> {
        let lemma = (!span.lemma.is_empty()).then_some(span.lemma.as_str());
        let mut key = self.normalizer.normalize(&span.text, lemma)?;

        // The marker is the encoding delimiter, so it must never appear
        // inside a key. Collisions are recovered by substitution and not
        // surfaced as errors.
        if key.contains(&self.config.marker) {
            key = key.replace(&self.config.marker, " ");
        }

        table.observe(&span.text, &key);
        Ok(collapse_whitespace(&key, &self.config.marker))
    }
}

/// Emit a verbatim token, unless it is purely whitespace.
fn emit_verbatim(out: &mut String, token: &Token, line_start: usize, report: &mut LineReport) {
    if token.is_whitespace() {
        return;
    }
    push_word(out, &token.text, line_start);
    report.tokens_emitted += 1;
}

/// Append a word to the line, space-separated from the previous one.
fn push_word(out: &mut String, word: &str, line_start: usize) {
    if out.len() > line_start {
        out.push(' ');
    }
    out.push_str(word);
}

/// Replace every internal whitespace run with the marker and append one
/// trailing marker: `"climate change"` with `_` becomes `climate_change_`.
///
/// Literal text is not sanitized for pre-existing marker characters; only
/// grouping-mode keys are (see [`SpanMarker::group_and_encode`]).
fn collapse_whitespace(text: &str, marker: &str) -> String {
    let mut out = String::with_capacity(text.len() + marker.len());
    for (i, piece) in text.split_whitespace().enumerate() {
        if i > 0 {
            out.push_str(marker);
        }
        out.push_str(piece);
    }
    out.push_str(marker);
    out
}

/// Check that spans are in-bounds, ordered, and non-overlapping.
fn validate_spans(tokens: &[Token], spans: &[Span]) -> Result<()> {
    let line_end = tokens.last().map_or(0, |t| t.end);
    let mut prev_end = 0;
    for span in spans {
        if span.start > span.end {
            return Err(MarkError::malformed_span(
                span.start,
                span.end,
                "start offset exceeds end offset",
            ));
        }
        if span.end > line_end {
            return Err(MarkError::malformed_span(
                span.start,
                span.end,
                format!("extends past the end of the line (line ends at {line_end})"),
            ));
        }
        if span.start < prev_end {
            return Err(MarkError::malformed_span(
                span.start,
                span.end,
                "overlaps or precedes an earlier span",
            ));
        }
        prev_end = span.end;
    }
    Ok(())
}
