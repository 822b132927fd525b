//! Random forest strategy backed by smartcore.

use log::debug;
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_classifier::{
    RandomForestClassifier, RandomForestClassifierParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::classifier::{
    Classifier, ClassifierStrategy, FittedClassifier, StrategyKind, dense_f64,
    validate_training_input,
};
use crate::corpus::Label;
use crate::error::{Result, SentimentError};
use crate::features::DesignMatrix;

/// Ensemble of decision trees with library defaults.
///
/// The library seeds its bootstrap sampling with a fixed value, so repeated
/// fits on the same input produce the same forest.
#[derive(Debug, Clone, Default)]
pub struct RandomForest;

impl RandomForest {
    pub fn new() -> Self {
        RandomForest
    }
}

impl ClassifierStrategy for RandomForest {
    fn kind(&self) -> StrategyKind {
        StrategyKind::RandomForest
    }

    fn fit(&self, matrix: &DesignMatrix, labels: &[Label]) -> Result<FittedClassifier> {
        validate_training_input(matrix, labels)?;
        debug!(
            "Fitting random forest on {}x{}",
            matrix.n_rows(),
            matrix.dimension()
        );

        let x = dense_f64(matrix)?;
        let inner = RandomForestClassifier::fit(
            &x,
            &labels.to_vec(),
            RandomForestClassifierParameters::default(),
        )
        .map_err(|e| SentimentError::training(format!("random forest: {e}")))?;

        Ok(FittedClassifier::RandomForest(RandomForestModel { inner }))
    }
}

/// A fitted random forest.
#[derive(Debug, Serialize, Deserialize)]
pub struct RandomForestModel {
    inner: RandomForestClassifier<f64, Label, DenseMatrix<f64>, Vec<Label>>,
}

impl Classifier for RandomForestModel {
    fn predict(&self, matrix: &DesignMatrix) -> Result<Vec<Label>> {
        let x = dense_f64(matrix)?;
        self.inner
            .predict(&x)
            .map_err(|e| SentimentError::prediction(format!("random forest: {e}")))
    }
}
