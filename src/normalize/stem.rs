//! Snowball stemmer wrapper
//!
//! Thin wrapper over the `rust-stemmers` crate. The NLTK stemmer this
//! mirrors lowercases its input before stemming; `rust-stemmers` does not,
//! so the wrapper lowercases here to keep normalized keys case-insensitive.

use std::fmt;

pub use rust_stemmers::Algorithm;

/// A Snowball stemmer for one language.
pub struct SnowballStemmer {
    inner: rust_stemmers::Stemmer,
}

impl SnowballStemmer {
    /// Create a stemmer for the given Snowball algorithm.
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            inner: rust_stemmers::Stemmer::create(algorithm),
        }
    }

    /// Create an English stemmer (the default for corpus preparation).
    pub fn english() -> Self {
        Self::new(Algorithm::English)
    }

    /// Stem a single word, lowercasing it first.
    pub fn stem(&self, word: &str) -> String {
        self.inner.stem(&word.to_lowercase()).into_owned()
    }
}

impl Default for SnowballStemmer {
    fn default() -> Self {
        Self::english()
    }
}

impl fmt::Debug for SnowballStemmer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowballStemmer").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stem_plural() {
        let stemmer = SnowballStemmer::english();
        assert_eq!(stemmer.stem("cats"), "cat");
        assert_eq!(stemmer.stem("dogs"), "dog");
    }

    #[test]
    fn test_stem_lowercases() {
        let stemmer = SnowballStemmer::english();
        assert_eq!(stemmer.stem("New"), "new");
        assert_eq!(stemmer.stem("YORK"), "york");
    }

    #[test]
    fn test_stem_stable_word() {
        let stemmer = SnowballStemmer::english();
        assert_eq!(stemmer.stem("art"), "art");
    }
}
