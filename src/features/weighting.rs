//! Document frequencies for tf-idf weighting.
//!
//! Weights follow the smoothed form `idf = ln((N + 1) / (df + 1)) + 1`, so a
//! token present in every document still keeps a weight of 1.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::features::vocabulary::Vocabulary;

/// Per-token document counts aligned with a vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentFrequencies {
    documents: usize,
    frequencies: Vec<u32>,
}

impl DocumentFrequencies {
    /// Count, for every vocabulary token, the sequences it occurs in.
    pub fn count<T: AsRef<[String]>>(vocabulary: &Vocabulary, sequences: &[T]) -> Self {
        let mut frequencies = vec![0u32; vocabulary.len()];
        let mut seen = AHashSet::new();

        for sequence in sequences {
            seen.clear();
            for token in sequence.as_ref() {
                if let Some(index) = vocabulary.index_of(token) {
                    if seen.insert(index) {
                        frequencies[index] = frequencies[index].saturating_add(1);
                    }
                }
            }
        }

        DocumentFrequencies {
            documents: sequences.len(),
            frequencies,
        }
    }

    /// Number of documents counted.
    pub fn documents(&self) -> usize {
        self.documents
    }

    /// Documents containing the token at `index`.
    pub fn frequency(&self, index: usize) -> Option<u32> {
        self.frequencies.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Inverse document frequency of the token at `index`.
    pub fn idf(&self, index: usize) -> f64 {
        let frequency = self.frequency(index).unwrap_or(0) as f64;
        ((self.documents as f64 + 1.0) / (frequency + 1.0)).ln() + 1.0
    }
}
