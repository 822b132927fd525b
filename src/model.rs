//! The trained model: vocabulary, vector mode and fitted classifier.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classifier::{FittedClassifier, StrategyKind};
use crate::corpus::Label;
use crate::features::{DocumentFrequencies, FeatureVectorizer, VectorMode, Vocabulary};

/// Information recorded about a training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Strategy that produced the classifier.
    pub strategy: StrategyKind,
    /// Vectorization mode used for training.
    pub mode: VectorMode,
    /// Minimum token count for vocabulary inclusion.
    pub trim: usize,
    pub vocabulary_size: usize,
    /// Phrases the classifier was fitted on.
    pub training_examples: usize,
    /// Records dropped while loading or tokenizing the corpus.
    pub skipped_records: usize,
    /// Distinct labels seen during training, ascending.
    pub labels: Vec<Label>,
    /// Name of the tokenizer used for training.
    pub tokenizer: String,
    /// Wall-clock time of the whole training run.
    pub training_time_ms: u64,
    /// Crate version that wrote the model.
    pub version: String,
    pub trained_at: DateTime<Utc>,
}

/// A trained sentiment model.
///
/// The vectorizer and classifier were fitted together; the vocabulary fixes
/// the feature dimension the classifier expects. Tf-idf models also keep
/// the document frequencies of the training corpus. A model is immutable
/// once built and can be shared across threads.
#[derive(Debug, Serialize, Deserialize)]
pub struct Model {
    vocabulary: Arc<Vocabulary>,
    mode: VectorMode,
    document_frequencies: Option<Arc<DocumentFrequencies>>,
    classifier: FittedClassifier,
    metadata: ModelMetadata,
}

impl Model {
    pub(crate) fn new(
        vectorizer: &FeatureVectorizer,
        vocabulary: Arc<Vocabulary>,
        classifier: FittedClassifier,
        metadata: ModelMetadata,
    ) -> Self {
        Model {
            vocabulary,
            mode: vectorizer.mode(),
            document_frequencies: vectorizer.document_frequencies().cloned(),
            classifier,
            metadata,
        }
    }

    pub fn vocabulary(&self) -> &Arc<Vocabulary> {
        &self.vocabulary
    }

    pub fn mode(&self) -> VectorMode {
        self.mode
    }

    /// Document frequencies used for tf-idf weighting.
    pub fn document_frequencies(&self) -> Option<&Arc<DocumentFrequencies>> {
        self.document_frequencies.as_ref()
    }

    pub fn classifier(&self) -> &FittedClassifier {
        &self.classifier
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    /// Strategy of the fitted classifier.
    pub fn strategy(&self) -> StrategyKind {
        self.classifier.kind()
    }

    /// Feature dimension the classifier expects.
    pub fn dimension(&self) -> usize {
        self.vocabulary.len()
    }

    /// A vectorizer bound to this model's vocabulary, mode and weights.
    pub fn vectorizer(&self) -> FeatureVectorizer {
        let vectorizer = FeatureVectorizer::fitted(self.mode, Arc::clone(&self.vocabulary));
        match &self.document_frequencies {
            Some(frequencies) => vectorizer.with_document_frequencies(Arc::clone(frequencies)),
            None => vectorizer,
        }
    }
}
