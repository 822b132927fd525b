//! Least squares regression used as a classifier.
//!
//! Labels are treated as a continuous target. Predictions are rounded to the
//! nearest integer and clamped to the label range seen during fitting. This
//! strategy is kept for comparison; it ignores that sentiment labels are
//! categories.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::linear_regression::{
    LinearRegression as LeastSquares, LinearRegressionParameters, LinearRegressionSolverName,
};

use crate::classifier::{
    Classifier, ClassifierStrategy, FittedClassifier, StrategyKind, dense_f64,
    distinct_labels, validate_training_input,
};
use crate::corpus::Label;
use crate::error::{Result, SentimentError};
use crate::features::DesignMatrix;

/// Linear regression strategy.
#[derive(Debug, Clone, Default)]
pub struct LinearRegression;

impl LinearRegression {
    pub fn new() -> Self {
        LinearRegression
    }
}

impl ClassifierStrategy for LinearRegression {
    fn kind(&self) -> StrategyKind {
        StrategyKind::LinearRegression
    }

    fn fit(&self, matrix: &DesignMatrix, labels: &[Label]) -> Result<FittedClassifier> {
        validate_training_input(matrix, labels)?;
        warn!("Linear regression treats sentiment labels as continuous values");
        debug!(
            "Fitting linear regression on {}x{}",
            matrix.n_rows(),
            matrix.dimension()
        );

        // The SVD solver needs more rows than coefficients (features plus intercept).
        if matrix.n_rows() <= matrix.dimension() {
            return Err(SentimentError::training(format!(
                "linear regression needs more phrases than features: {} phrases, {} features",
                matrix.n_rows(),
                matrix.dimension()
            )));
        }

        let classes = distinct_labels(labels);
        let (min_label, max_label) = match (classes.first(), classes.last()) {
            (Some(&min), Some(&max)) => (min, max),
            _ => return Err(SentimentError::training("no labels to regress on")),
        };

        let x = dense_f64(matrix)?;
        let y: Vec<f64> = labels.iter().map(|&label| label as f64).collect();
        // Bag-of-words matrices are usually rank deficient.
        let parameters =
            LinearRegressionParameters::default().with_solver(LinearRegressionSolverName::SVD);
        let inner = LeastSquares::fit(&x, &y, parameters)
            .map_err(|e| SentimentError::training(format!("linear regression: {e}")))?;

        Ok(FittedClassifier::LinearRegression(LinearRegressionModel {
            inner,
            min_label,
            max_label,
        }))
    }
}

/// A fitted regression with its label range.
#[derive(Debug, Serialize, Deserialize)]
pub struct LinearRegressionModel {
    inner: LeastSquares<f64, f64, DenseMatrix<f64>, Vec<f64>>,
    min_label: Label,
    max_label: Label,
}

impl LinearRegressionModel {
    fn to_label(&self, value: f64) -> Label {
        if !value.is_finite() {
            return self.min_label;
        }
        let rounded = value.round().clamp(self.min_label as f64, self.max_label as f64);
        rounded as Label
    }
}

impl Classifier for LinearRegressionModel {
    fn predict(&self, matrix: &DesignMatrix) -> Result<Vec<Label>> {
        let x = dense_f64(matrix)?;
        let values = self
            .inner
            .predict(&x)
            .map_err(|e| SentimentError::prediction(format!("linear regression: {e}")))?;

        Ok(values.into_iter().map(|value| self.to_label(value)).collect())
    }
}
