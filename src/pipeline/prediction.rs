//! Text to labels with a trained model.

use std::sync::Arc;

use log::{debug, warn};
use rayon::prelude::*;

use crate::analysis::tokenizer::{PhraseTokenizer, Tokenizer};
use crate::classifier::Classifier;
use crate::corpus::{Label, LabeledText};
use crate::error::{Result, SentimentError};
use crate::model::Model;
use crate::pipeline::evaluation::{Evaluation, evaluate};

/// Tokenizes, vectorizes and classifies unlabeled phrases.
pub struct PredictionPipeline {
    tokenizer: Arc<dyn Tokenizer>,
}

impl std::fmt::Debug for PredictionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictionPipeline")
            .field("tokenizer", &self.tokenizer.name())
            .finish()
    }
}

impl Default for PredictionPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictionPipeline {
    /// Create a pipeline using [`PhraseTokenizer`].
    pub fn new() -> Self {
        Self::with_tokenizer(Arc::new(PhraseTokenizer::new()))
    }

    pub fn with_tokenizer(tokenizer: Arc<dyn Tokenizer>) -> Self {
        PredictionPipeline { tokenizer }
    }

    /// Predict one label per text, in input order.
    ///
    /// Tokens unknown to the model contribute nothing. Unlike training, a
    /// text the tokenizer rejects fails the whole call, since every input
    /// must map to a prediction.
    pub fn predict<S>(&self, model: &Model, texts: &[S]) -> Result<Vec<Label>>
    where
        S: AsRef<str> + Sync,
    {
        if model.metadata().tokenizer != self.tokenizer.name() {
            warn!(
                "Model was trained with the '{}' tokenizer but '{}' is in use",
                model.metadata().tokenizer,
                self.tokenizer.name()
            );
        }
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let sequences = texts
            .par_iter()
            .map(|text| self.tokenizer.tokenize(text.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let matrix = model.vectorizer().transform_batch(&sequences)?;
        if matrix.dimension() != model.dimension() {
            return Err(SentimentError::dimension_mismatch(
                model.dimension(),
                matrix.dimension(),
            ));
        }

        let labels = model.classifier().predict(&matrix)?;
        if labels.len() != texts.len() {
            return Err(SentimentError::prediction(format!(
                "expected {} predictions, got {}",
                texts.len(),
                labels.len()
            )));
        }

        debug!("Predicted {} labels with {}", labels.len(), model.strategy());
        Ok(labels)
    }

    /// Predict labeled records and score the result against their labels.
    pub fn evaluate(&self, model: &Model, records: &[LabeledText]) -> Result<Evaluation> {
        let texts: Vec<&str> = records.iter().map(|record| record.text.as_str()).collect();
        let predicted = self.predict(model, &texts)?;
        let gold: Vec<Label> = records.iter().map(|record| record.label).collect();
        evaluate(&predicted, &gold)
    }
}
