//! Bag-of-words vectorization against a fitted vocabulary.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SentimentError};
use crate::features::vocabulary::Vocabulary;
use crate::features::weighting::DocumentFrequencies;

/// What each feature position records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorMode {
    /// 1 if the token occurs in the phrase, else 0.
    #[default]
    Binary,
    /// Number of occurrences of the token in the phrase.
    Count,
    /// Sublinear term frequency `1 + ln(tf)` times the token's inverse
    /// document frequency, L2-normalized per phrase.
    TfIdf,
}

impl VectorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            VectorMode::Binary => "binary",
            VectorMode::Count => "count",
            VectorMode::TfIdf => "tfidf",
        }
    }

    /// Whether the mode needs document frequencies from the training corpus.
    pub fn uses_document_frequencies(&self) -> bool {
        matches!(self, VectorMode::TfIdf)
    }
}

impl fmt::Display for VectorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VectorMode {
    type Err = SentimentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "binary" => Ok(VectorMode::Binary),
            "count" => Ok(VectorMode::Count),
            "tfidf" | "tf-idf" | "tf_idf" => Ok(VectorMode::TfIdf),
            other => Err(SentimentError::invalid_config(format!(
                "unknown vector mode '{other}' (expected binary, count or tfidf)"
            ))),
        }
    }
}

/// Dense feature vector aligned with a vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        FeatureVector { values }
    }

    /// Length of the vector (the vocabulary size it was built against).
    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Positions holding a non-zero value.
    pub fn nonzero(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, value)| **value != 0.0)
            .map(|(index, value)| (index, *value))
    }

    /// Whether every value is a whole number.
    pub fn is_integral(&self) -> bool {
        self.values.iter().all(|value| value.fract() == 0.0)
    }
}

/// Rows of feature vectors sharing one dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignMatrix {
    dimension: usize,
    rows: Vec<FeatureVector>,
}

impl DesignMatrix {
    /// Create an empty matrix whose rows must have `dimension` columns.
    pub fn new(dimension: usize) -> Self {
        DesignMatrix {
            dimension,
            rows: Vec::new(),
        }
    }

    /// Create a matrix from rows, checking every row against `dimension`.
    pub fn from_rows(dimension: usize, rows: Vec<FeatureVector>) -> Result<Self> {
        if let Some(row) = rows.iter().find(|row| row.dimension() != dimension) {
            return Err(SentimentError::dimension_mismatch(
                dimension,
                row.dimension(),
            ));
        }
        Ok(DesignMatrix { dimension, rows })
    }

    /// Append a row.
    pub fn push(&mut self, row: FeatureVector) -> Result<()> {
        if row.dimension() != self.dimension {
            return Err(SentimentError::dimension_mismatch(
                self.dimension,
                row.dimension(),
            ));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[FeatureVector] {
        &self.rows
    }

    /// Whether every value of every row is a whole number.
    pub fn is_integral(&self) -> bool {
        self.rows.iter().all(FeatureVector::is_integral)
    }
}

/// Maps token sequences onto feature vectors.
///
/// A vectorizer starts unfitted; [`FeatureVectorizer::fit`] binds it to a
/// vocabulary, after which the output dimension is fixed. The tf-idf mode
/// also needs [`FeatureVectorizer::fit_document_frequencies`].
#[derive(Clone, Default)]
pub struct FeatureVectorizer {
    mode: VectorMode,
    vocabulary: Option<Arc<Vocabulary>>,
    document_frequencies: Option<Arc<DocumentFrequencies>>,
}

impl fmt::Debug for FeatureVectorizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureVectorizer")
            .field("mode", &self.mode)
            .field("dimension", &self.dimension())
            .field("weighted", &self.document_frequencies.is_some())
            .finish()
    }
}

impl FeatureVectorizer {
    /// Create an unfitted vectorizer.
    pub fn new(mode: VectorMode) -> Self {
        FeatureVectorizer {
            mode,
            vocabulary: None,
            document_frequencies: None,
        }
    }

    /// Create a vectorizer already bound to `vocabulary`.
    pub fn fitted(mode: VectorMode, vocabulary: Arc<Vocabulary>) -> Self {
        FeatureVectorizer {
            mode,
            vocabulary: Some(vocabulary),
            document_frequencies: None,
        }
    }

    /// Attach previously counted document frequencies.
    pub fn with_document_frequencies(mut self, frequencies: Arc<DocumentFrequencies>) -> Self {
        self.document_frequencies = Some(frequencies);
        self
    }

    /// Bind the vectorizer to `vocabulary`, replacing any previous one.
    ///
    /// Document frequencies counted against an earlier vocabulary are dropped.
    pub fn fit(&mut self, vocabulary: Arc<Vocabulary>) {
        self.vocabulary = Some(vocabulary);
        self.document_frequencies = None;
    }

    /// Count document frequencies of the vocabulary tokens over `sequences`.
    pub fn fit_document_frequencies<T: AsRef<[String]>>(&mut self, sequences: &[T]) -> Result<()> {
        let vocabulary = self.require_vocabulary()?;
        let frequencies = DocumentFrequencies::count(vocabulary, sequences);
        self.document_frequencies = Some(Arc::new(frequencies));
        Ok(())
    }

    pub fn is_fitted(&self) -> bool {
        self.vocabulary.is_some()
            && (!self.mode.uses_document_frequencies() || self.document_frequencies.is_some())
    }

    pub fn mode(&self) -> VectorMode {
        self.mode
    }

    /// Output dimension, once fitted.
    pub fn dimension(&self) -> Option<usize> {
        self.vocabulary.as_ref().map(|vocabulary| vocabulary.len())
    }

    pub fn vocabulary(&self) -> Option<&Arc<Vocabulary>> {
        self.vocabulary.as_ref()
    }

    pub fn document_frequencies(&self) -> Option<&Arc<DocumentFrequencies>> {
        self.document_frequencies.as_ref()
    }

    /// Vectorize one token sequence. Tokens outside the vocabulary are ignored.
    pub fn transform<S: AsRef<str>>(&self, tokens: &[S]) -> Result<FeatureVector> {
        let vocabulary = self.require_vocabulary()?;
        let mut values = vec![0.0; vocabulary.len()];

        for token in tokens {
            if let Some(index) = vocabulary.index_of(token.as_ref()) {
                match self.mode {
                    VectorMode::Binary => values[index] = 1.0,
                    VectorMode::Count | VectorMode::TfIdf => values[index] += 1.0,
                }
            }
        }

        if self.mode == VectorMode::TfIdf {
            self.apply_tf_idf(&mut values)?;
        }

        Ok(FeatureVector::new(values))
    }

    /// Vectorize many token sequences in parallel, keeping their order.
    pub fn transform_batch<T>(&self, sequences: &[T]) -> Result<DesignMatrix>
    where
        T: AsRef<[String]> + Sync,
    {
        let vocabulary = self.require_vocabulary()?;
        let rows = sequences
            .par_iter()
            .map(|tokens| {
                let tokens: &[String] = tokens.as_ref();
                self.transform(tokens)
            })
            .collect::<Result<Vec<_>>>()?;

        DesignMatrix::from_rows(vocabulary.len(), rows)
    }

    fn apply_tf_idf(&self, values: &mut [f64]) -> Result<()> {
        let frequencies = self.document_frequencies.as_deref().ok_or_else(|| {
            SentimentError::not_fitted("tf-idf weighting has no document frequencies")
        })?;
        if frequencies.len() != values.len() {
            return Err(SentimentError::dimension_mismatch(
                values.len(),
                frequencies.len(),
            ));
        }

        for (index, value) in values.iter_mut().enumerate() {
            if *value > 0.0 {
                *value = (1.0 + value.ln()) * frequencies.idf(index);
            }
        }

        let norm = values.iter().map(|value| value * value).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in values.iter_mut() {
                *value /= norm;
            }
        }
        Ok(())
    }

    fn require_vocabulary(&self) -> Result<&Vocabulary> {
        self.vocabulary
            .as_deref()
            .ok_or_else(|| SentimentError::not_fitted("feature vectorizer has no vocabulary"))
    }
}
