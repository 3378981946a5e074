//! Span marking
//!
//! This module provides the per-line marking state machine that collapses
//! noun-phrase spans into single marker-delimited tokens, with optional
//! variant grouping.

pub mod engine;

pub use engine::{LineReport, SpanMarker};
