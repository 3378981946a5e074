//! # npmark
//!
//! Corpus preparation for phrase-embedding training: collapses
//! externally-detected noun-phrase spans into single marker-delimited
//! tokens (`"climate change"` → `climate_change_`), and optionally groups
//! semantically-equivalent phrase variants under a normalized key,
//! electing the most frequent variant as the group representative.
//!
//! The crate never tokenizes or parses text itself — tokens and spans come
//! from an injected [`Segmenter`](corpus::Segmenter), and phrase
//! normalization runs through an injected [`Normalizer`](normalize::Normalizer).
//! Output is deterministic and reproducible: grouping state is
//! caller-owned, mutated strictly in line order, and serialized with
//! stable key ordering.
//!
//! ## Quick start
//!
//! ```
//! use npmark::{CorpusMarker, MarkerConfig, PhraseNormalizer, PlainSegmenter};
//! use npmark::corpus::NoopObserver;
//!
//! # fn main() -> npmark::Result<()> {
//! let mut runner = CorpusMarker::new(
//!     PlainSegmenter,
//!     PhraseNormalizer::new(),
//!     MarkerConfig::default(),
//! )?;
//!
//! let mut marked = Vec::new();
//! let report = runner.run("one two three\n".as_bytes(), &mut marked, &mut NoopObserver)?;
//! assert_eq!(report.lines, 1);
//! # Ok(())
//! # }
//! ```
//!
//! For grouping mode, enable it in the config and serialize the artifacts
//! after the pass:
//!
//! ```ignore
//! let cfg = MarkerConfig::default().with_grouping(true);
//! // ... run the corpus ...
//! runner.write_grouping(&mut np2id_file, &mut id2rep_file, &mut id2group_file)?;
//! ```

pub mod corpus;
pub mod errors;
pub mod grouping;
pub mod marker;
pub mod normalize;
pub mod types;

pub use corpus::{CorpusMarker, PlainSegmenter, RunReport, Segmenter};
pub use errors::{MarkError, Result};
pub use grouping::{GroupingSnapshot, GroupingTable};
pub use marker::{LineReport, SpanMarker};
pub use normalize::{Lemmatizer, NoopLemmatizer, Normalizer, PhraseNormalizer};
pub use types::{MarkerConfig, ParsedLine, Span, Token, DEFAULT_MARKER, PRON_LEMMA};
