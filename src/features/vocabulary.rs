//! Vocabulary building with frequency trimming.
//!
//! # Examples
//!
//! ```
//! use phrase_sentiment::corpus::{Corpus, Phrase};
//! use phrase_sentiment::features::VocabularyBuilder;
//!
//! let corpus = Corpus::new(vec![
//!     Phrase::new(vec!["good".into(), "movie".into()], Some(4)),
//!     Phrase::new(vec!["bad".into(), "film".into()], Some(0)),
//! ]);
//!
//! let vocabulary = VocabularyBuilder::new(1).unwrap().build(&corpus).unwrap();
//! assert_eq!(vocabulary.tokens(), ["good", "movie", "bad", "film"]);
//! ```

use ahash::AHashMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::corpus::Corpus;
use crate::error::{Result, SentimentError};

/// Occurrence counts per token.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    counts: AHashMap<String, usize>,
}

impl FrequencyTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more occurrence of `token` and return its new count.
    pub fn increment(&mut self, token: &str) -> usize {
        match self.counts.get_mut(token) {
            Some(count) => {
                *count += 1;
                *count
            }
            None => {
                self.counts.insert(token.to_string(), 1);
                1
            }
        }
    }

    /// Occurrences of `token` seen so far.
    pub fn count(&self, token: &str) -> usize {
        self.counts.get(token).copied().unwrap_or(0)
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no token has been counted.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total number of counted occurrences.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

/// Ordered set of distinct tokens.
///
/// The position of a token is its feature index. Serialized as the plain
/// token list; the lookup index is rebuilt on load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    tokens: Vec<String>,
    index: AHashMap<String, usize>,
}

impl Vocabulary {
    /// Create an empty vocabulary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `token` unless it is already present. Returns whether it was added.
    pub fn insert(&mut self, token: &str) -> bool {
        if self.index.contains_key(token) {
            return false;
        }
        self.index.insert(token.to_string(), self.tokens.len());
        self.tokens.push(token.to_string());
        true
    }

    /// Feature index of `token`.
    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.index.get(token).copied()
    }

    /// Token at feature index `index`.
    pub fn token(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(String::as_str)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.index.contains_key(token)
    }

    /// Tokens in feature order.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl PartialEq for Vocabulary {
    fn eq(&self, other: &Self) -> bool {
        self.tokens == other.tokens
    }
}

impl Eq for Vocabulary {}

impl From<Vec<String>> for Vocabulary {
    fn from(tokens: Vec<String>) -> Self {
        let mut vocabulary = Vocabulary::new();
        for token in &tokens {
            vocabulary.insert(token);
        }
        vocabulary
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(vocabulary: Vocabulary) -> Self {
        vocabulary.tokens
    }
}

/// Builds a [`Vocabulary`] from a corpus.
///
/// A token enters the vocabulary the moment its running count reaches
/// `trim`, so the final order is the order in which tokens first reached
/// the threshold during a single pass over the corpus.
#[derive(Debug, Clone)]
pub struct VocabularyBuilder {
    trim: usize,
    require_non_empty: bool,
}

impl Default for VocabularyBuilder {
    fn default() -> Self {
        VocabularyBuilder {
            trim: 1,
            require_non_empty: false,
        }
    }
}

impl VocabularyBuilder {
    /// Create a builder with the given minimum occurrence count.
    pub fn new(trim: usize) -> Result<Self> {
        if trim == 0 {
            return Err(SentimentError::invalid_config(
                "vocabulary trim threshold must be at least 1",
            ));
        }
        Ok(VocabularyBuilder {
            trim,
            ..Default::default()
        })
    }

    /// Reject corpora that contain no tokens at all.
    pub fn with_require_non_empty(mut self, require: bool) -> Self {
        self.require_non_empty = require;
        self
    }

    /// The minimum occurrence count.
    pub fn trim(&self) -> usize {
        self.trim
    }

    /// Build the vocabulary of `corpus`.
    pub fn build(&self, corpus: &Corpus) -> Result<Vocabulary> {
        self.build_with_frequencies(corpus)
            .map(|(vocabulary, _)| vocabulary)
    }

    /// Build the vocabulary of `corpus` and return the token counts as well.
    pub fn build_with_frequencies(&self, corpus: &Corpus) -> Result<(Vocabulary, FrequencyTable)> {
        if self.require_non_empty && corpus.is_empty() {
            return Err(SentimentError::invalid_corpus(
                "cannot build a vocabulary from an empty corpus",
            ));
        }

        let (vocabulary, frequencies) = self.build_from_sequences(corpus.token_sequences());

        if self.require_non_empty && frequencies.is_empty() {
            return Err(SentimentError::invalid_corpus(
                "corpus contains no tokens",
            ));
        }

        debug!(
            "Built vocabulary of {} tokens from {} distinct ({} occurrences, trim {})",
            vocabulary.len(),
            frequencies.len(),
            frequencies.total(),
            self.trim
        );

        Ok((vocabulary, frequencies))
    }

    /// Single pass over raw token sequences.
    pub fn build_from_sequences<'a, I>(&self, sequences: I) -> (Vocabulary, FrequencyTable)
    where
        I: IntoIterator<Item = &'a [String]>,
    {
        let mut vocabulary = Vocabulary::new();
        let mut frequencies = FrequencyTable::new();

        for tokens in sequences {
            for token in tokens {
                // Exactly-equal keeps each token from being appended twice.
                if frequencies.increment(token) == self.trim {
                    vocabulary.insert(token);
                }
            }
        }

        (vocabulary, frequencies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Phrase;

    fn corpus_of(phrases: &[&[&str]]) -> Corpus {
        Corpus::new(
            phrases
                .iter()
                .map(|tokens| {
                    Phrase::new(tokens.iter().map(|t| t.to_string()).collect(), Some(0))
                })
                .collect(),
        )
    }

    #[test]
    fn test_first_occurrence_order() {
        let corpus = corpus_of(&[&["good", "movie"], &["bad", "film"]]);
        let vocabulary = VocabularyBuilder::new(1).unwrap().build(&corpus).unwrap();

        assert_eq!(vocabulary.tokens(), ["good", "movie", "bad", "film"]);
        assert_eq!(vocabulary.index_of("bad"), Some(2));
        assert_eq!(vocabulary.token(3), Some("film"));
    }

    #[test]
    fn test_trim_orders_by_threshold_crossing() {
        let corpus = corpus_of(&[&["a", "b", "a"], &["c", "b", "a"]]);
        let (vocabulary, frequencies) = VocabularyBuilder::new(2)
            .unwrap()
            .build_with_frequencies(&corpus)
            .unwrap();

        assert_eq!(vocabulary.tokens(), ["a", "b"]);
        assert_eq!(frequencies.count("a"), 3);
        assert_eq!(frequencies.count("c"), 1);
        assert_eq!(frequencies.total(), 6);
    }

    #[test]
    fn test_trim_above_all_counts_gives_empty_vocabulary() {
        let corpus = corpus_of(&[&["good", "movie"]]);
        let vocabulary = VocabularyBuilder::new(5)
            .unwrap()
            .with_require_non_empty(true)
            .build(&corpus)
            .unwrap();

        assert!(vocabulary.is_empty());
    }

    #[test]
    fn test_zero_trim_is_rejected() {
        assert!(matches!(
            VocabularyBuilder::new(0),
            Err(SentimentError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_empty_corpus() {
        let corpus = Corpus::default();

        let vocabulary = VocabularyBuilder::default().build(&corpus).unwrap();
        assert!(vocabulary.is_empty());

        let result = VocabularyBuilder::default()
            .with_require_non_empty(true)
            .build(&corpus);
        assert!(matches!(result, Err(SentimentError::InvalidCorpus(_))));
    }

    #[test]
    fn test_from_token_list_drops_duplicates() {
        let vocabulary = Vocabulary::from(vec![
            "good".to_string(),
            "bad".to_string(),
            "good".to_string(),
        ]);

        assert_eq!(vocabulary.tokens(), ["good", "bad"]);
        assert_eq!(vocabulary.index_of("bad"), Some(1));
    }

    #[test]
    fn test_serde_keeps_order_and_index() {
        let vocabulary = Vocabulary::from(vec!["x".to_string(), "y".to_string()]);
        let json = serde_json::to_string(&vocabulary).unwrap();
        assert_eq!(json, r#"["x","y"]"#);

        let restored: Vocabulary = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, vocabulary);
        assert_eq!(restored.index_of("y"), Some(1));
    }
}
