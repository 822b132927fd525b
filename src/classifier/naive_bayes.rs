//! Naive Bayes strategies backed by smartcore.

use log::debug;
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::naive_bayes::bernoulli::{BernoulliNB, BernoulliNBParameters};
use smartcore::naive_bayes::multinomial::{MultinomialNB, MultinomialNBParameters};

use crate::classifier::{
    Classifier, ClassifierStrategy, FittedClassifier, StrategyKind, WEIGHT_SCALE, dense_counts,
    dense_presence, validate_training_input,
};
use crate::corpus::Label;
use crate::error::{Result, SentimentError};
use crate::features::DesignMatrix;

/// Multinomial naive Bayes over token counts.
///
/// Fractional (tf-idf) weights are fitted as fixed-point counts in units of
/// `1 / WEIGHT_SCALE`. The smoothing is scaled by the same factor so the
/// per-class token probabilities match those of fractional counts.
#[derive(Debug, Clone)]
pub struct NaiveBayes {
    alpha: f64,
}

impl NaiveBayes {
    /// Create the strategy with additive smoothing `alpha`.
    pub fn new(alpha: f64) -> Self {
        NaiveBayes { alpha }
    }
}

impl Default for NaiveBayes {
    fn default() -> Self {
        NaiveBayes::new(1.0)
    }
}

impl ClassifierStrategy for NaiveBayes {
    fn kind(&self) -> StrategyKind {
        StrategyKind::NaiveBayes
    }

    fn fit(&self, matrix: &DesignMatrix, labels: &[Label]) -> Result<FittedClassifier> {
        validate_training_input(matrix, labels)?;
        debug!(
            "Fitting multinomial naive Bayes on {}x{} (alpha {})",
            matrix.n_rows(),
            matrix.dimension(),
            self.alpha
        );

        let scale = if matrix.is_integral() {
            1.0
        } else {
            WEIGHT_SCALE
        };
        let x = dense_counts(matrix, scale)?;
        let parameters = MultinomialNBParameters::default().with_alpha(self.alpha * scale);
        let inner = MultinomialNB::fit(&x, &labels.to_vec(), parameters)
            .map_err(|e| SentimentError::training(format!("multinomial naive Bayes: {e}")))?;

        Ok(FittedClassifier::NaiveBayes(MultinomialNbModel { inner, scale }))
    }
}

/// A fitted multinomial naive Bayes classifier.
#[derive(Debug, Serialize, Deserialize)]
pub struct MultinomialNbModel {
    inner: MultinomialNB<u32, Label, DenseMatrix<u32>, Vec<Label>>,
    /// Factor applied to feature values before fitting.
    scale: f64,
}

impl Classifier for MultinomialNbModel {
    fn predict(&self, matrix: &DesignMatrix) -> Result<Vec<Label>> {
        let x = dense_counts(matrix, self.scale)?;
        self.inner
            .predict(&x)
            .map_err(|e| SentimentError::prediction(format!("multinomial naive Bayes: {e}")))
    }
}

/// Bernoulli naive Bayes over token presence.
///
/// Features are binarized before fitting, so the vector mode has no effect on
/// this strategy.
#[derive(Debug, Clone)]
pub struct BernoulliNaiveBayes {
    alpha: f64,
}

impl BernoulliNaiveBayes {
    pub fn new(alpha: f64) -> Self {
        BernoulliNaiveBayes { alpha }
    }
}

impl Default for BernoulliNaiveBayes {
    fn default() -> Self {
        BernoulliNaiveBayes::new(1.0)
    }
}

impl ClassifierStrategy for BernoulliNaiveBayes {
    fn kind(&self) -> StrategyKind {
        StrategyKind::BernoulliNaiveBayes
    }

    fn fit(&self, matrix: &DesignMatrix, labels: &[Label]) -> Result<FittedClassifier> {
        validate_training_input(matrix, labels)?;
        debug!(
            "Fitting Bernoulli naive Bayes on {}x{} (alpha {})",
            matrix.n_rows(),
            matrix.dimension(),
            self.alpha
        );

        let x = dense_presence(matrix)?;
        let parameters = BernoulliNBParameters::<u32>::default().with_alpha(self.alpha);
        let inner = BernoulliNB::fit(&x, &labels.to_vec(), parameters)
            .map_err(|e| SentimentError::training(format!("Bernoulli naive Bayes: {e}")))?;

        Ok(FittedClassifier::BernoulliNaiveBayes(BernoulliNbModel { inner }))
    }
}

/// A fitted Bernoulli naive Bayes classifier.
#[derive(Debug, Serialize, Deserialize)]
pub struct BernoulliNbModel {
    inner: BernoulliNB<u32, Label, DenseMatrix<u32>, Vec<Label>>,
}

impl Classifier for BernoulliNbModel {
    fn predict(&self, matrix: &DesignMatrix) -> Result<Vec<Label>> {
        let x = dense_presence(matrix)?;
        self.inner
            .predict(&x)
            .map_err(|e| SentimentError::prediction(format!("Bernoulli naive Bayes: {e}")))
    }
}
