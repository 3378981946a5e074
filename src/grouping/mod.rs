//! Phrase variant grouping
//!
//! When grouping mode is enabled, every marked span feeds a process-lifetime
//! [`GroupingTable`] that maps normalized keys to the literal phrase
//! variants observed for them and elects a representative variant by
//! frequency. The table is caller-owned (no hidden singleton) and grows
//! monotonically over one corpus pass.
//!
//! Representative election is order-sensitive: the representative is the
//! variant with the strictly highest observation count, and ties keep the
//! earlier-seen variant. Lines must therefore be applied in corpus order
//! under a single-writer discipline.

use std::collections::BTreeMap;
use std::io::Write;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

// ============================================================================
// GroupingTable
// ============================================================================

/// Cross-sentence grouping state: variant counts, phrase-to-key mapping,
/// per-key variant lists (first-seen order), and per-key representatives.
///
/// Invariants, maintained after every [`observe`](GroupingTable::observe):
/// - every phrase with a key appears in that key's variant list;
/// - the representative of a key is a member of its variant list;
/// - the representative has the maximum count among the key's variants,
///   with ties broken by first-seen order.
#[derive(Debug, Clone, Default)]
pub struct GroupingTable {
    /// Observation count per literal phrase text.
    counts: FxHashMap<String, u64>,
    /// Literal phrase text -> normalized key.
    phrase_to_key: FxHashMap<String, String>,
    /// Normalized key -> variants in first-seen order, no duplicates.
    key_to_variants: FxHashMap<String, Vec<String>>,
    /// Normalized key -> current representative variant.
    key_to_rep: FxHashMap<String, String>,
}

impl GroupingTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one observation of `phrase` under its normalized `key`.
    ///
    /// Bumps the phrase count, registers the variant (first-seen order),
    /// and re-elects the representative if this phrase's count is now
    /// strictly higher. A tie never changes the representative.
    pub fn observe(&mut self, phrase: &str, key: &str) {
        let count = self.counts.entry(phrase.to_string()).or_insert(0);
        *count += 1;
        let count = *count;

        self.phrase_to_key
            .insert(phrase.to_string(), key.to_string());

        let variants = self.key_to_variants.entry(key.to_string()).or_default();
        if !variants.iter().any(|v| v == phrase) {
            variants.push(phrase.to_string());
        }

        let elect = match self.key_to_rep.get(key) {
            None => true,
            Some(rep) if rep == phrase => false,
            // Strictly greater: a tie keeps the earlier representative.
            Some(rep) => count > self.counts.get(rep).copied().unwrap_or(0),
        };
        if elect {
            self.key_to_rep.insert(key.to_string(), phrase.to_string());
        }
    }

    /// Observation count for a literal phrase.
    pub fn count(&self, phrase: &str) -> u64 {
        self.counts.get(phrase).copied().unwrap_or(0)
    }

    /// Normalized key recorded for a phrase, if any.
    pub fn key_for(&self, phrase: &str) -> Option<&str> {
        self.phrase_to_key.get(phrase).map(String::as_str)
    }

    /// Current representative for a key, if any.
    pub fn representative(&self, key: &str) -> Option<&str> {
        self.key_to_rep.get(key).map(String::as_str)
    }

    /// Variants recorded for a key, in first-seen order.
    pub fn variants(&self, key: &str) -> Option<&[String]> {
        self.key_to_variants.get(key).map(Vec::as_slice)
    }

    /// Number of distinct normalized keys.
    pub fn num_keys(&self) -> usize {
        self.key_to_variants.len()
    }

    /// Number of distinct literal phrases observed.
    pub fn num_phrases(&self) -> usize {
        self.counts.len()
    }

    /// Whether the table holds no observations.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Verify the table invariants, returning the first violation found.
    ///
    /// Intended for tests and debugging; `observe` maintains the invariants
    /// incrementally.
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        for (phrase, key) in &self.phrase_to_key {
            let variants = self
                .key_to_variants
                .get(key)
                .ok_or_else(|| format!("key {key:?} has no variant list"))?;
            if !variants.iter().any(|v| v == phrase) {
                return Err(format!("phrase {phrase:?} missing from variants of {key:?}"));
            }
        }
        for (key, variants) in &self.key_to_variants {
            let rep = self
                .key_to_rep
                .get(key)
                .ok_or_else(|| format!("key {key:?} has no representative"))?;
            if !variants.iter().any(|v| v == rep) {
                return Err(format!("representative {rep:?} not a variant of {key:?}"));
            }
            let rep_count = self.count(rep);
            // Election is strict greater-than, so a tie never unseats the
            // incumbent: the only violation is a variant whose count
            // strictly exceeds the representative's.
            for variant in variants {
                let c = self.count(variant);
                if c > rep_count {
                    return Err(format!(
                        "representative of {key:?} should be {variant:?} (count {c}), not {rep:?} (count {rep_count})"
                    ));
                }
            }
        }
        Ok(())
    }

    /// Take a serializable, deterministically-ordered snapshot of the table.
    pub fn snapshot(&self) -> GroupingSnapshot {
        GroupingSnapshot {
            np2id: self
                .phrase_to_key
                .iter()
                .map(|(p, k)| (p.clone(), k.clone()))
                .collect(),
            id2rep: self
                .key_to_rep
                .iter()
                .map(|(k, r)| (k.clone(), r.clone()))
                .collect(),
            id2group: self
                .key_to_variants
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    /// Serialize the three grouping artifacts as JSON documents, one per
    /// writer, in the order `np2id`, `id2rep`, `id2group`.
    pub fn write_artifacts<W1, W2, W3>(
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
        let snapshot = self.snapshot();
        serde_json::to_writer(np2id, &snapshot.np2id)?;
        serde_json::to_writer(id2rep, &snapshot.id2rep)?;
        serde_json::to_writer(id2group, &snapshot.id2group)?;
        Ok(())
    }
}

// ============================================================================
// GroupingSnapshot
// ============================================================================

/// Serialized form of a [`GroupingTable`].
///
/// Maps are `BTreeMap`-keyed so the serialized artifacts are byte-stable
/// across runs regardless of hash iteration order. Variant lists keep
/// first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupingSnapshot {
    /// Literal phrase text -> normalized key.
    pub np2id: BTreeMap<String, String>,
    /// Normalized key -> representative variant.
    pub id2rep: BTreeMap<String, String>,
    /// Normalized key -> all variants, first-seen order.
    pub id2group: BTreeMap<String, Vec<String>>,
}
