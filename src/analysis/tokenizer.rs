//! Tokenizers that turn a raw phrase into normalized tokens.
//!
//! Tokenization is the first step of both training and prediction. The same
//! tokenizer contract must be used on both sides, otherwise the vocabulary
//! built at training time will not line up with the tokens seen at inference.
//!
//! # Examples
//!
//! ```
//! use phrase_sentiment::analysis::tokenizer::{PhraseTokenizer, Tokenizer};
//!
//! let tokenizer = PhraseTokenizer::new();
//! let tokens = tokenizer.tokenize("A  Gorgeous\tFilm\r\n").unwrap();
//! assert_eq!(tokens, vec!["a", "gorgeous", "film"]);
//! ```

use crate::error::Result;

/// Trait for tokenizers that convert a phrase into tokens.
///
/// The trait requires `Send + Sync` so that pipelines can tokenize phrases
/// in parallel.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text.
    ///
    /// Empty input yields an empty token sequence. An error rejects this
    /// single text unit; callers decide whether that is fatal.
    fn tokenize(&self, text: &str) -> Result<Vec<String>>;

    /// Get the name of this tokenizer (for debugging and model metadata).
    fn name(&self) -> &'static str;
}

/// Whitespace tokenizer with lowercase normalization.
///
/// - Splits on any Unicode whitespace
/// - Lowercases each token
/// - Strips trailing control characters (`\r`, stray line terminators) left
///   over by line-oriented readers
/// - Drops tokens that become empty after stripping
#[derive(Clone, Debug, Default)]
pub struct PhraseTokenizer;

impl PhraseTokenizer {
    /// Create a new phrase tokenizer.
    pub fn new() -> Self {
        PhraseTokenizer
    }

    fn normalize(word: &str) -> Option<String> {
        let trimmed = word.trim_matches(|c: char| c.is_whitespace() || c.is_control());
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_lowercase())
        }
    }
}

impl Tokenizer for PhraseTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        Ok(text.split_whitespace().filter_map(Self::normalize).collect())
    }

    fn name(&self) -> &'static str {
        "phrase"
    }
}
