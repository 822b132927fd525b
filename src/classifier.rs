//! Interchangeable classification strategies.
//!
//! Every strategy fits a design matrix and a label vector into a
//! [`FittedClassifier`], which predicts one label per row. Strategies are
//! selected at runtime by [`StrategyKind`]; the rest of the pipeline never
//! branches on which one is in use.
//!
//! - [`NaiveBayes`]: multinomial naive Bayes over counts (default)
//! - [`BernoulliNaiveBayes`]: naive Bayes over token presence
//! - [`LinearSgd`]: one-vs-rest linear classifier trained with SGD on hinge loss
//! - [`RandomForest`]: ensemble of decision trees
//! - [`LinearRegression`]: least squares regression rounded to the nearest label
//!
//! # Examples
//!
//! ```
//! use phrase_sentiment::classifier::{Classifier, StrategyConfig, StrategyKind};
//! use phrase_sentiment::features::{DesignMatrix, FeatureVector};
//!
//! let matrix = DesignMatrix::from_rows(2, vec![
//!     FeatureVector::new(vec![1.0, 0.0]),
//!     FeatureVector::new(vec![0.0, 1.0]),
//! ]).unwrap();
//!
//! let strategy = StrategyKind::NaiveBayes.strategy(&StrategyConfig::default());
//! let classifier = strategy.fit(&matrix, &[4, 0]).unwrap();
//! assert_eq!(classifier.predict(&matrix).unwrap(), vec![4, 0]);
//! ```

pub mod linear_regression;
pub mod naive_bayes;
pub mod random_forest;
pub mod sgd;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::corpus::Label;
use crate::error::{Result, SentimentError};
use crate::features::DesignMatrix;

pub use linear_regression::{LinearRegression, LinearRegressionModel};
pub use naive_bayes::{BernoulliNaiveBayes, BernoulliNbModel, MultinomialNbModel, NaiveBayes};
pub use random_forest::{RandomForest, RandomForestModel};
pub use sgd::{LinearSgd, SgdConfig, SgdModel};

/// A trained classifier.
pub trait Classifier: Send + Sync {
    /// Predict one label per row, in row order.
    fn predict(&self, matrix: &DesignMatrix) -> Result<Vec<Label>>;
}

/// An untrained classification strategy.
pub trait ClassifierStrategy: Send + Sync {
    /// Which strategy this is.
    fn kind(&self) -> StrategyKind;

    /// Fit the strategy on `matrix` with one label per row.
    fn fit(&self, matrix: &DesignMatrix, labels: &[Label]) -> Result<FittedClassifier>;

    fn name(&self) -> &'static str {
        self.kind().as_str()
    }
}

/// Selects a classification strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    #[default]
    NaiveBayes,
    BernoulliNaiveBayes,
    LinearSgd,
    RandomForest,
    LinearRegression,
}

impl StrategyKind {
    /// Every selectable strategy.
    pub const ALL: [StrategyKind; 5] = [
        StrategyKind::NaiveBayes,
        StrategyKind::BernoulliNaiveBayes,
        StrategyKind::LinearSgd,
        StrategyKind::RandomForest,
        StrategyKind::LinearRegression,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::NaiveBayes => "naive-bayes",
            StrategyKind::BernoulliNaiveBayes => "bernoulli-naive-bayes",
            StrategyKind::LinearSgd => "linear-sgd",
            StrategyKind::RandomForest => "random-forest",
            StrategyKind::LinearRegression => "linear-regression",
        }
    }

    /// Strategies that are selectable but treat ordinal labels as a
    /// continuous target.
    pub fn is_discouraged(&self) -> bool {
        matches!(self, StrategyKind::LinearRegression)
    }

    /// Build the strategy with the given hyperparameters.
    pub fn strategy(&self, config: &StrategyConfig) -> Box<dyn ClassifierStrategy> {
        match self {
            StrategyKind::NaiveBayes => Box::new(NaiveBayes::new(config.naive_bayes_alpha)),
            StrategyKind::BernoulliNaiveBayes => {
                Box::new(BernoulliNaiveBayes::new(config.naive_bayes_alpha))
            }
            StrategyKind::LinearSgd => Box::new(LinearSgd::new(config.sgd.clone())),
            StrategyKind::RandomForest => Box::new(RandomForest::new()),
            StrategyKind::LinearRegression => Box::new(LinearRegression::new()),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = SentimentError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "naive-bayes" | "nb" | "multinomial-nb" => Ok(StrategyKind::NaiveBayes),
            "bernoulli-naive-bayes" | "bernoulli-nb" => Ok(StrategyKind::BernoulliNaiveBayes),
            "linear-sgd" | "sgd" => Ok(StrategyKind::LinearSgd),
            "random-forest" | "rf" => Ok(StrategyKind::RandomForest),
            "linear-regression" | "lr" => Ok(StrategyKind::LinearRegression),
            _ => Err(SentimentError::invalid_config(format!(
                "unknown strategy '{s}'"
            ))),
        }
    }
}

/// Strategy hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Additive smoothing for both naive Bayes variants.
    pub naive_bayes_alpha: f64,
    pub sgd: SgdConfig,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig {
            naive_bayes_alpha: 1.0,
            sgd: SgdConfig::default(),
        }
    }
}

/// A classifier produced by one of the strategies.
#[derive(Debug, Serialize, Deserialize)]
pub enum FittedClassifier {
    NaiveBayes(MultinomialNbModel),
    BernoulliNaiveBayes(BernoulliNbModel),
    LinearSgd(SgdModel),
    RandomForest(RandomForestModel),
    LinearRegression(LinearRegressionModel),
}

impl FittedClassifier {
    /// The strategy that produced this classifier.
    pub fn kind(&self) -> StrategyKind {
        match self {
            FittedClassifier::NaiveBayes(_) => StrategyKind::NaiveBayes,
            FittedClassifier::BernoulliNaiveBayes(_) => StrategyKind::BernoulliNaiveBayes,
            FittedClassifier::LinearSgd(_) => StrategyKind::LinearSgd,
            FittedClassifier::RandomForest(_) => StrategyKind::RandomForest,
            FittedClassifier::LinearRegression(_) => StrategyKind::LinearRegression,
        }
    }

    fn inner(&self) -> &dyn Classifier {
        match self {
            FittedClassifier::NaiveBayes(model) => model,
            FittedClassifier::BernoulliNaiveBayes(model) => model,
            FittedClassifier::LinearSgd(model) => model,
            FittedClassifier::RandomForest(model) => model,
            FittedClassifier::LinearRegression(model) => model,
        }
    }
}

impl Classifier for FittedClassifier {
    fn predict(&self, matrix: &DesignMatrix) -> Result<Vec<Label>> {
        if matrix.is_empty() {
            return Ok(Vec::new());
        }

        let labels = self.inner().predict(matrix)?;
        if labels.len() != matrix.n_rows() {
            return Err(SentimentError::prediction(format!(
                "{} returned {} labels for {} rows",
                self.kind(),
                labels.len(),
                matrix.n_rows()
            )));
        }
        Ok(labels)
    }
}

/// Checks shared by every strategy before fitting.
pub(crate) fn validate_training_input(matrix: &DesignMatrix, labels: &[Label]) -> Result<()> {
    if matrix.is_empty() {
        return Err(SentimentError::training("design matrix has no rows"));
    }
    if matrix.n_rows() != labels.len() {
        return Err(SentimentError::training(format!(
            "design matrix has {} rows but {} labels were given",
            matrix.n_rows(),
            labels.len()
        )));
    }
    if matrix.dimension() == 0 {
        return Err(SentimentError::training(
            "design matrix has no feature columns (empty vocabulary)",
        ));
    }
    Ok(())
}

/// Distinct labels in ascending order.
pub(crate) fn distinct_labels(labels: &[Label]) -> Vec<Label> {
    let mut classes = labels.to_vec();
    classes.sort_unstable();
    classes.dedup();
    classes
}

/// Fixed-point scale for fractional weights fed to count-based backends.
pub(crate) const WEIGHT_SCALE: f64 = 1000.0;

/// Whole-number matrix for count-based backends, each value times `scale`.
pub(crate) fn dense_counts(matrix: &DesignMatrix, scale: f64) -> Result<DenseMatrix<u32>> {
    let rows: Vec<Vec<u32>> = matrix
        .rows()
        .iter()
        .map(|row| {
            row.values()
                .iter()
                .map(|&value| (value * scale).round().max(0.0) as u32)
                .collect()
        })
        .collect();
    DenseMatrix::from_2d_vec(&rows)
        .map_err(|e| SentimentError::training(format!("failed to build feature matrix: {e}")))
}

/// 0/1 matrix marking the non-zero positions.
pub(crate) fn dense_presence(matrix: &DesignMatrix) -> Result<DenseMatrix<u32>> {
    let rows: Vec<Vec<u32>> = matrix
        .rows()
        .iter()
        .map(|row| row.values().iter().map(|&value| u32::from(value > 0.0)).collect())
        .collect();
    DenseMatrix::from_2d_vec(&rows)
        .map_err(|e| SentimentError::training(format!("failed to build feature matrix: {e}")))
}

pub(crate) fn dense_f64(matrix: &DesignMatrix) -> Result<DenseMatrix<f64>> {
    let rows: Vec<Vec<f64>> = matrix.rows().iter().map(|row| row.values().to_vec()).collect();
    DenseMatrix::from_2d_vec(&rows)
        .map_err(|e| SentimentError::training(format!("failed to build feature matrix: {e}")))
}
