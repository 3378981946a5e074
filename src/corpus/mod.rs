//! Corpus runner
//!
//! Drives line-by-line marking over a whole corpus: an injected
//! [`Segmenter`] turns each raw line into tokens and noun-phrase spans, the
//! [`SpanMarker`](crate::marker::SpanMarker) collapses the spans, and the
//! marked lines stream to a writer. In grouping mode the runner owns the
//! [`GroupingTable`] and serializes its artifacts at the end of the pass.
//!
//! Lines are processed strictly in input order: representative election is
//! first-seen-tie-break sensitive, so reordering would make grouping output
//! non-reproducible. Upstream parsing may run ahead concurrently; the
//! marking step itself is single-writer.

pub mod observer;

use std::io::{BufRead, Write};

use crate::errors::Result;
use crate::grouping::GroupingTable;
use crate::marker::{LineReport, SpanMarker};
use crate::normalize::Normalizer;
use crate::types::{MarkerConfig, ParsedLine, Token};

pub use observer::{LineTallyObserver, MarkObserver, NoopObserver};

/// Progress is logged every this many lines (with the `tracing` feature).
pub const PROGRESS_INTERVAL: usize = 500;

// ============================================================================
// Segmenter
// ============================================================================

/// Produces tokens and noun-phrase spans for one raw line.
///
/// This is the seam to the external natural-language parser; the runner
/// never depends on a specific parsing library's types.
pub trait Segmenter {
    /// Segment one line into ordered tokens and ordered, non-overlapping
    /// spans.
    fn segment(&self, line: &str) -> Result<ParsedLine>;
}

/// Whitespace segmenter producing no spans — the trivial default.
///
/// Every line degenerates to verbatim token emission; useful for wiring
/// tests and for corpora that are pre-marked upstream.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainSegmenter;

impl Segmenter for PlainSegmenter {
    fn segment(&self, line: &str) -> Result<ParsedLine> {
        let mut tokens = Vec::new();
        let mut start: Option<usize> = None;
        for (i, c) in line.char_indices() {
            if c.is_whitespace() {
                if let Some(s) = start.take() {
                    tokens.push(Token::new(&line[s..i], s, i));
                }
            } else if start.is_none() {
                start = Some(i);
            }
        }
        if let Some(s) = start {
            tokens.push(Token::new(&line[s..], s, line.len()));
        }
        Ok(ParsedLine::new(tokens, Vec::new()))
    }
}

// ============================================================================
// RunReport
// ============================================================================

/// Totals for one corpus pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Lines processed.
    pub lines: usize,
    /// Spans collapsed into marked tokens.
    pub spans_marked: usize,
    /// Spans emitted as literal text.
    pub spans_passed_through: usize,
}

// ============================================================================
// CorpusMarker
// ============================================================================

/// End-to-end corpus marking: segmenter + span marker + optional grouping.
#[derive(Debug)]
pub struct CorpusMarker<S, N> {
    segmenter: S,
    marker: SpanMarker<N>,
    grouping: Option<GroupingTable>,
}

impl<S: Segmenter, N: Normalizer> CorpusMarker<S, N> {
    /// Create a corpus marker.
    ///
    /// A grouping table is allocated when `config.grouping` is set. Fails
    /// if the marker string is invalid.
    pub fn new(segmenter: S, normalizer: N, config: MarkerConfig) -> Result<Self> {
        let grouping = config.grouping.then(GroupingTable::new);
        let marker = SpanMarker::with_config(normalizer, config)?;
        Ok(Self {
            segmenter,
            marker,
            grouping,
        })
    }

    /// Mark one already-parsed line, appending output to `out`.
    ///
    /// Exposed so callers with their own I/O loop can drive the runner one
    /// line at a time while still sharing the grouping state.
    pub fn mark_parsed(&mut self, parsed: &ParsedLine, out: &mut String) -> Result<LineReport> {
        self.marker
            .mark_line(&parsed.tokens, &parsed.spans, self.grouping.as_mut(), out)
    }

    /// Mark every line of `reader` in order, streaming output to `writer`
    /// and notifying `observer` after each line.
    ///
    /// A malformed line or normalization failure aborts the run and
    /// surfaces to the caller; skip-versus-abort policy is the caller's,
    /// applied by driving [`mark_parsed`](Self::mark_parsed) directly.
    pub fn run<R, W>(
        &mut self,
        reader: R,
        writer: &mut W,
        observer: &mut impl MarkObserver,
    ) -> Result<RunReport>
    where
        R: BufRead,
        W: Write,
    {
        let mut totals = RunReport::default();
        let mut buf = String::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let parsed = self.segmenter.segment(&line)?;

            buf.clear();
            let report = self.mark_parsed(&parsed, &mut buf)?;
            writer.write_all(buf.as_bytes())?;

            totals.lines += 1;
            totals.spans_marked += report.spans_marked;
            totals.spans_passed_through += report.spans_passed_through;
            observer.on_line(idx, &report);

            #[cfg(feature = "tracing")]
            if totals.lines % PROGRESS_INTERVAL == 0 {
                tracing::info!(
                    lines = totals.lines,
                    spans_marked = totals.spans_marked,
                    "corpus marking progress"
                );
            }
        }

        Ok(totals)
    }

    /// The grouping table, when grouping mode is enabled.
    pub fn grouping(&self) -> Option<&GroupingTable> {
        self.grouping.as_ref()
    }

    /// Consume the runner and hand the grouping table to the caller.
    pub fn into_grouping(self) -> Option<GroupingTable> {
        self.grouping
    }

    /// Serialize the grouping artifacts (`np2id`, `id2rep`, `id2group`) as
    /// JSON, one document per writer. No-op when grouping is disabled.
    pub fn write_grouping<W1, W2, W3>(
        &self,
        np2id: &mut W1,
        id2rep: &mut W2,
        id2group: &mut W3,
    ) -> Result<()>
    where
        W1: Write,
        W2: Write,
        W3: Write,
    {
        if let Some(table) = &self.grouping {
            table.write_artifacts(np2id, id2rep, id2group)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::PhraseNormalizer;
    use crate::types::Span;
    use std::collections::BTreeMap;

    /// Test segmenter: whitespace tokens plus spans for a fixed phrase
    /// list (first occurrence per phrase, left-to-right).
    struct PhraseSegmenter {
        phrases: Vec<(&'static str, &'static str)>,
    }

    impl Segmenter for PhraseSegmenter {
        fn segment(&self, line: &str) -> Result<ParsedLine> {
            let mut parsed = PlainSegmenter.segment(line)?;
            let mut spans: Vec<Span> = self
                .phrases
                .iter()
                .filter_map(|(text, lemma)| {
                    line.find(text)
                        .map(|pos| Span::new(pos, pos + text.len(), *text, *lemma))
                })
                .collect();
            spans.sort_by_key(|s| s.start);
            parsed.spans = spans;
            Ok(parsed)
        }
    }

    #[test]
    fn test_plain_segmenter_offsets() {
        let parsed = PlainSegmenter.segment("  The  quick fox").unwrap();
        assert_eq!(parsed.tokens.len(), 3);
        assert_eq!(parsed.tokens[0], Token::new("The", 2, 5));
        assert_eq!(parsed.tokens[1], Token::new("quick", 7, 12));
        assert_eq!(parsed.tokens[2], Token::new("fox", 13, 16));
        assert!(parsed.spans.is_empty());
    }

    #[test]
    fn test_run_without_spans_is_verbatim() {
        let mut runner = CorpusMarker::new(
            PlainSegmenter,
            PhraseNormalizer::new(),
            MarkerConfig::default(),
        )
        .unwrap();

        let input = "one two three\nfour five\n";
        let mut output = Vec::new();
        let report = runner
            .run(input.as_bytes(), &mut output, &mut NoopObserver)
            .unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), input);
        assert_eq!(report.lines, 2);
        assert_eq!(report.spans_marked, 0);
        assert!(runner.grouping().is_none());
    }

    #[test]
    fn test_run_marks_spans_and_notifies_observer() {
        let segmenter = PhraseSegmenter {
            phrases: vec![("climate change", "climate change")],
        };
        let mut runner = CorpusMarker::new(
            segmenter,
            PhraseNormalizer::new(),
            MarkerConfig::default(),
        )
        .unwrap();

        let input = "The climate change is real\nno phrase here\n";
        let mut output = Vec::new();
        let mut obs = LineTallyObserver::new();
        let report = runner.run(input.as_bytes(), &mut output, &mut obs).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "The climate_change_ is real\nno phrase here\n"
        );
        assert_eq!(report.lines, 2);
        assert_eq!(report.spans_marked, 1);
        assert_eq!(obs.lines(), 2);
        assert_eq!(obs.spans_marked(), 1);
    }

    #[test]
    fn test_grouping_run_elects_frequent_variant() {
        let segmenter = PhraseSegmenter {
            phrases: vec![("New York", "New York"), ("NY", "New York")],
        };
        let mut runner = CorpusMarker::new(
            segmenter,
            PhraseNormalizer::new(),
            MarkerConfig::default().with_grouping(true),
        )
        .unwrap();

        // "New York" 3 times, "NY" 5 times.
        let mut input = String::new();
        for _ in 0..3 {
            input.push_str("New York is loud\n");
        }
        for _ in 0..5 {
            input.push_str("NY is loud\n");
        }

        let mut output = Vec::new();
        let report = runner
            .run(input.as_bytes(), &mut output, &mut NoopObserver)
            .unwrap();

        assert_eq!(report.lines, 8);
        assert_eq!(report.spans_marked, 8);
        // Every occurrence encodes to the shared key.
        let output = String::from_utf8(output).unwrap();
        assert_eq!(output.matches("new_york_").count(), 8);

        let table = runner.grouping().unwrap();
        assert_eq!(table.representative("new york"), Some("NY"));
        table.check_invariants().unwrap();
    }

    #[test]
    fn test_write_grouping_artifacts() {
        let segmenter = PhraseSegmenter {
            phrases: vec![("New York", "New York")],
        };
        let mut runner = CorpusMarker::new(
            segmenter,
            PhraseNormalizer::new(),
            MarkerConfig::default().with_grouping(true),
        )
        .unwrap();

        runner
            .run(
                "New York is loud\n".as_bytes(),
                &mut Vec::new(),
                &mut NoopObserver,
            )
            .unwrap();

        let (mut np2id, mut id2rep, mut id2group) = (Vec::new(), Vec::new(), Vec::new());
        runner
            .write_grouping(&mut np2id, &mut id2rep, &mut id2group)
            .unwrap();

        let np2id: BTreeMap<String, String> = serde_json::from_slice(&np2id).unwrap();
        assert_eq!(np2id["New York"], "new york");
        let id2rep: BTreeMap<String, String> = serde_json::from_slice(&id2rep).unwrap();
        assert_eq!(id2rep["new york"], "New York");
    }

    #[test]
    fn test_invalid_marker_rejected_at_construction() {
        let result = CorpusMarker::new(
            PlainSegmenter,
            PhraseNormalizer::new(),
            MarkerConfig::default().with_marker("___"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_into_grouping_hands_over_table() {
        let segmenter = PhraseSegmenter {
            phrases: vec![("New York", "New York")],
        };
        let mut runner = CorpusMarker::new(
            segmenter,
            PhraseNormalizer::new(),
            MarkerConfig::default().with_grouping(true),
        )
        .unwrap();
        runner
            .run(
                "New York is loud\n".as_bytes(),
                &mut Vec::new(),
                &mut NoopObserver,
            )
            .unwrap();

        let table = runner.into_grouping().unwrap();
        assert_eq!(table.num_keys(), 1);
    }
}
