//! Labeled phrases and the corpus they form.
//!
//! A corpus source yields raw `(text, label)` records. The training pipeline
//! tokenizes them into [`Phrase`]s, which are immutable once built, and
//! collects them into a [`Corpus`] that keeps the source order.

pub mod reader;

use log::warn;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

pub use reader::{ColumnRef, DataSplit, TsvCorpusReader, TsvOptions, read_unlabeled};

/// Discrete sentiment label (e.g. 0 = negative .. 4 = positive).
pub type Label = u32;

/// A raw labeled record as produced by a corpus source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledText {
    /// Untokenized phrase text.
    pub text: String,
    /// Sentiment label.
    pub label: Label,
}

impl LabeledText {
    /// Create a new labeled record.
    pub fn new<S: Into<String>>(text: S, label: Label) -> Self {
        LabeledText {
            text: text.into(),
            label,
        }
    }
}

/// Records loaded from a corpus source.
#[derive(Debug, Clone, Default)]
pub struct LoadedCorpus {
    /// Successfully parsed records, in source order.
    pub records: Vec<LabeledText>,
    /// Number of malformed records that were skipped while loading.
    pub skipped: usize,
}

/// Something that can produce labeled training records.
pub trait CorpusSource {
    /// Load every record of the source.
    fn load(&self) -> Result<LoadedCorpus>;

    /// Short human-readable description used in log lines.
    fn describe(&self) -> String;
}

impl CorpusSource for Vec<LabeledText> {
    fn load(&self) -> Result<LoadedCorpus> {
        Ok(LoadedCorpus {
            records: self.clone(),
            skipped: 0,
        })
    }

    fn describe(&self) -> String {
        format!("in-memory corpus ({} records)", self.len())
    }
}

/// A tokenized phrase with an optional label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phrase {
    tokens: Vec<String>,
    label: Option<Label>,
}

impl Phrase {
    /// Create a phrase from already normalized tokens.
    pub fn new(tokens: Vec<String>, label: Option<Label>) -> Self {
        Phrase { tokens, label }
    }

    /// The phrase tokens, in order.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// The sentiment label, if known.
    pub fn label(&self) -> Option<Label> {
        self.label
    }
}

impl AsRef<[String]> for Phrase {
    fn as_ref(&self) -> &[String] {
        &self.tokens
    }
}

/// An ordered collection of phrases.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    phrases: Vec<Phrase>,
}

impl Corpus {
    /// Create a corpus from phrases.
    pub fn new(phrases: Vec<Phrase>) -> Self {
        Corpus { phrases }
    }

    /// Tokenize labeled records in parallel.
    ///
    /// The resulting corpus keeps the record order. Records the tokenizer
    /// rejects are logged and skipped; their count is returned alongside.
    pub fn from_records(records: &[LabeledText], tokenizer: &dyn Tokenizer) -> (Self, usize) {
        let tokenized: Vec<Result<Phrase>> = records
            .par_iter()
            .map(|record| {
                tokenizer
                    .tokenize(&record.text)
                    .map(|tokens| Phrase::new(tokens, Some(record.label)))
            })
            .collect();

        let mut phrases = Vec::with_capacity(tokenized.len());
        let mut skipped = 0;
        for (index, result) in tokenized.into_iter().enumerate() {
            match result {
                Ok(phrase) => phrases.push(phrase),
                Err(e) => {
                    warn!("Skipping record {index}: tokenization failed: {e}");
                    skipped += 1;
                }
            }
        }

        (Corpus { phrases }, skipped)
    }

    /// The phrases, in source order.
    pub fn phrases(&self) -> &[Phrase] {
        &self.phrases
    }

    /// Number of phrases.
    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    /// Whether the corpus has no phrases.
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Iterate over the token sequences, in order.
    pub fn token_sequences(&self) -> impl Iterator<Item = &[String]> + '_ {
        self.phrases.iter().map(|phrase| phrase.tokens())
    }
}
