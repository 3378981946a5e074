//! Phrase normalization
//!
//! Canonicalizes a phrase into a normalized key by splitting it on a fixed
//! separator set and running each piece through a lemmatizer and a stemmer.
//! The key is what grouping mode deduplicates phrase variants on.

pub mod stem;

use crate::errors::Result;
use stem::SnowballStemmer;

/// Separator characters a phrase is split on before stemming.
const SEPARATORS: [char; 8] = [' ', '-', ',', ';', '.', '@', '&', '_'];

// ============================================================================
// Capability traits
// ============================================================================

/// Lemmatization capability, injected by the caller.
///
/// Only exercised when a span arrives without a parser-supplied lemma; each
/// fragment is lemmatized individually as a generic noun.
pub trait Lemmatizer {
    /// Lemmatize a single word.
    fn lemmatize(&self, word: &str) -> Result<String>;
}

/// Identity lemmatizer — the default when spans carry parser lemmas.
///
/// Returns each word unchanged and lets the stemmer do the collapsing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLemmatizer;

impl Lemmatizer for NoopLemmatizer {
    fn lemmatize(&self, word: &str) -> Result<String> {
        Ok(word.to_string())
    }
}

/// Phrase-to-key normalization capability.
///
/// Must be deterministic for a given input: grouping output is training
/// data and has to be reproducible across runs.
pub trait Normalizer {
    /// Normalize a phrase into its canonical key.
    ///
    /// `lemma` is the parser-supplied lemma of the whole phrase, when
    /// available; implementations should prefer it over re-deriving one.
    fn normalize(&self, text: &str, lemma: Option<&str>) -> Result<String>;
}

// ============================================================================
// PhraseNormalizer
// ============================================================================

/// Standard normalizer: separator split + lemmatize + Snowball stem.
///
/// An all-caps single word ending in `S` is treated as an acronym plural
/// (e.g. `DVDS`) and returned unchanged — stemming it would corrupt the
/// proper-noun abbreviation.
#[derive(Debug)]
pub struct PhraseNormalizer<L = NoopLemmatizer> {
    lemmatizer: L,
    stemmer: SnowballStemmer,
}

impl Default for PhraseNormalizer<NoopLemmatizer> {
    fn default() -> Self {
        Self::new()
    }
}

impl PhraseNormalizer<NoopLemmatizer> {
    /// Create a normalizer with the identity lemmatizer and an English
    /// Snowball stemmer.
    pub fn new() -> Self {
        Self {
            lemmatizer: NoopLemmatizer,
            stemmer: SnowballStemmer::english(),
        }
    }
}

impl<L: Lemmatizer> PhraseNormalizer<L> {
    /// Create a normalizer with a custom lemmatizer.
    pub fn with_lemmatizer(lemmatizer: L) -> Self {
        Self {
            lemmatizer,
            stemmer: SnowballStemmer::english(),
        }
    }

    /// Builder method: override the stemmer.
    pub fn with_stemmer(mut self, stemmer: SnowballStemmer) -> Self {
        self.stemmer = stemmer;
        self
    }
}

/// Whether normalization is skipped for this phrase: a single whitespace-free
/// word, entirely upper-case, ending in the plural letter `S`.
fn is_acronym_plural(text: &str) -> bool {
    text.split_whitespace().count() == 1
        && text.ends_with('S')
        && text.chars().any(char::is_alphabetic)
        && !text.chars().any(char::is_lowercase)
}

impl<L: Lemmatizer> Normalizer for PhraseNormalizer<L> {
    fn normalize(&self, text: &str, lemma: Option<&str>) -> Result<String> {
        if is_acronym_plural(text) {
            return Ok(text.to_string());
        }

        let stems: Vec<String> = match lemma {
            // Lemma path: the parser already lemmatized the whole phrase;
            // only the stemmer runs, piece by piece.
            Some(lemma) => lemma
                .split(' ')
                .map(|piece| self.stemmer.stem(piece))
                .collect(),
            // Token path: split on separators, lemmatize each fragment as a
            // generic noun, then stem.
            None => text
                .trim()
                .split(|c: char| SEPARATORS.contains(&c))
                .filter(|fragment| !fragment.is_empty())
                .map(|fragment| {
                    let lemma = self.lemmatizer.lemmatize(fragment)?;
                    Ok(self.stemmer.stem(&lemma))
                })
                .collect::<Result<_>>()?,
        };

        Ok(stems.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MarkError;

    #[test]
    fn test_acronym_plural_guard() {
        let norm = PhraseNormalizer::new();
        // All-caps single word ending in S: returned unchanged.
        assert_eq!(norm.normalize("DVDS", None).unwrap(), "DVDS");
        assert_eq!(norm.normalize("UFOS", None).unwrap(), "UFOS");
    }

    #[test]
    fn test_acronym_guard_requires_all_conditions() {
        let norm = PhraseNormalizer::new();
        // Mixed case: stemmed normally.
        assert_eq!(norm.normalize("Dogs", None).unwrap(), "dog");
        // Two words, both upper: not a single acronym.
        assert_eq!(norm.normalize("NEW DOGS", None).unwrap(), "new dog");
    }

    #[test]
    fn test_lemma_path_stems_lemma_pieces() {
        let norm = PhraseNormalizer::new();
        let key = norm.normalize("New York", Some("New York")).unwrap();
        assert_eq!(key, "new york");
    }

    #[test]
    fn test_variants_share_key_via_lemma() {
        let norm = PhraseNormalizer::new();
        let a = norm.normalize("New York", Some("New York")).unwrap();
        let b = norm.normalize("NY", Some("New York")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_token_path_splits_separators() {
        let norm = PhraseNormalizer::new();
        // Hyphens and repeated separators produce no empty fragments.
        assert_eq!(
            norm.normalize("state-of-the-art", None).unwrap(),
            "state of the art"
        );
        assert_eq!(norm.normalize("cats &  dogs", None).unwrap(), "cat dog");
    }

    #[test]
    fn test_deterministic() {
        let norm = PhraseNormalizer::new();
        let a = norm.normalize("climate changes", None).unwrap();
        let b = norm.normalize("climate changes", None).unwrap();
        assert_eq!(a, b);
    }

    /// Lemmatizer failures surface as normalization errors.
    #[test]
    fn test_lemmatizer_failure_propagates() {
        struct FailingLemmatizer;
        impl Lemmatizer for FailingLemmatizer {
            fn lemmatize(&self, word: &str) -> Result<String> {
                Err(MarkError::normalization(word, "no model loaded"))
            }
        }

        let norm = PhraseNormalizer::with_lemmatizer(FailingLemmatizer);
        assert!(norm.normalize("climate change", None).is_err());
        // The lemma path never touches the lemmatizer.
        assert!(norm.normalize("climate change", Some("climate change")).is_ok());
    }

    #[test]
    fn test_custom_lemmatizer() {
        struct PluralStripper;
        impl Lemmatizer for PluralStripper {
            fn lemmatize(&self, word: &str) -> Result<String> {
                Ok(word.strip_suffix('s').unwrap_or(word).to_string())
            }
        }

        let norm = PhraseNormalizer::with_lemmatizer(PluralStripper);
        assert_eq!(norm.normalize("dogs", None).unwrap(), "dog");
    }
}
