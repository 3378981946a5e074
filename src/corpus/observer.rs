//! Corpus observer — per-line hooks for progress tracking and telemetry.
//!
//! Observers receive a notification after every marked line without
//! coupling to the marking logic. Use cases include progress bars, line
//! counters, and structured telemetry.

use crate::marker::LineReport;

/// Receives a callback after each line is marked.
pub trait MarkObserver {
    /// Called once per input line, in corpus order. `line_idx` is
    /// zero-based.
    fn on_line(&mut self, line_idx: usize, report: &LineReport) {
        let _ = (line_idx, report);
    }
}

/// Observer that does nothing — zero-overhead default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl MarkObserver for NoopObserver {}

/// Observer that tallies per-line reports into running totals.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineTallyObserver {
    lines: usize,
    spans_marked: usize,
    spans_passed_through: usize,
}

impl LineTallyObserver {
    /// Create a tally observer with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of lines observed so far.
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Total spans collapsed into marked tokens.
    pub fn spans_marked(&self) -> usize {
        self.spans_marked
    }

    /// Total spans emitted as literal text.
    pub fn spans_passed_through(&self) -> usize {
        self.spans_passed_through
    }
}

impl MarkObserver for LineTallyObserver {
    fn on_line(&mut self, _line_idx: usize, report: &LineReport) {
        self.lines += 1;
        self.spans_marked += report.spans_marked;
        self.spans_passed_through += report.spans_passed_through;
    }
}
