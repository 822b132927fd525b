//! Linear classifier trained with stochastic gradient descent.
//!
//! One weight vector per class (one-vs-rest), hinge loss with L2
//! regularization, and an inverse-scaling learning rate
//! `eta = eta0 / (1 + alpha * eta0 * t)`. Weight decay is applied through a
//! shared scale factor so that each update only touches the non-zero
//! features of the sample.
//!
//! Sample order is shuffled every epoch with a seeded generator, so fitting
//! the same input twice yields the same weights.

use std::time::Instant;

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::classifier::{
    Classifier, ClassifierStrategy, FittedClassifier, StrategyKind, distinct_labels,
    validate_training_input,
};
use crate::corpus::Label;
use crate::error::{Result, SentimentError};
use crate::features::DesignMatrix;

/// Scale below which decayed weights are folded back into the vector.
const MIN_SCALE: f64 = 1e-9;

/// SGD hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SgdConfig {
    /// Passes over the training data.
    pub epochs: usize,
    /// Initial learning rate (`eta0`).
    pub learning_rate: f64,
    /// L2 regularization strength.
    pub alpha: f64,
    /// Seed for the per-epoch shuffle.
    pub seed: u64,
}

impl Default for SgdConfig {
    fn default() -> Self {
        SgdConfig {
            epochs: 5,
            learning_rate: 0.01,
            alpha: 1e-4,
            seed: 42,
        }
    }
}

/// SGD strategy.
#[derive(Debug, Clone, Default)]
pub struct LinearSgd {
    config: SgdConfig,
}

impl LinearSgd {
    pub fn new(config: SgdConfig) -> Self {
        LinearSgd { config }
    }

    fn validate_config(&self) -> Result<()> {
        if self.config.epochs == 0 {
            return Err(SentimentError::invalid_config("SGD needs at least one epoch"));
        }
        if self.config.learning_rate.is_nan() || self.config.learning_rate <= 0.0 {
            return Err(SentimentError::invalid_config(
                "SGD learning rate must be positive",
            ));
        }
        if self.config.alpha < 0.0 {
            return Err(SentimentError::invalid_config(
                "SGD regularization must not be negative",
            ));
        }
        Ok(())
    }
}

impl ClassifierStrategy for LinearSgd {
    fn kind(&self) -> StrategyKind {
        StrategyKind::LinearSgd
    }

    fn fit(&self, matrix: &DesignMatrix, labels: &[Label]) -> Result<FittedClassifier> {
        validate_training_input(matrix, labels)?;
        self.validate_config()
            .map_err(|e| SentimentError::training(e.to_string()))?;

        let classes = distinct_labels(labels);
        if classes.len() < 2 {
            return Err(SentimentError::training(format!(
                "linear SGD needs at least two classes, found {}",
                classes.len()
            )));
        }

        let start = Instant::now();
        let samples: Vec<Vec<(usize, f64)>> = matrix
            .rows()
            .iter()
            .map(|row| row.nonzero().collect())
            .collect();

        let mut learners: Vec<BinaryLearner> = classes
            .iter()
            .map(|_| BinaryLearner::new(matrix.dimension()))
            .collect();

        let SgdConfig {
            epochs,
            learning_rate,
            alpha,
            seed,
        } = self.config;
        let mut rng = StdRng::seed_from_u64(seed);
        let mut order: Vec<usize> = (0..samples.len()).collect();
        let mut step = 0usize;

        for epoch in 0..epochs {
            order.shuffle(&mut rng);
            let mut violations = 0usize;

            for &sample in &order {
                step += 1;
                let eta = learning_rate / (1.0 + alpha * learning_rate * step as f64);
                for (class, learner) in classes.iter().zip(learners.iter_mut()) {
                    let target = if labels[sample] == *class { 1.0 } else { -1.0 };
                    if learner.step(&samples[sample], target, eta, alpha) {
                        violations += 1;
                    }
                }
            }

            debug!(
                "SGD epoch {}/{}: {violations} margin violations",
                epoch + 1,
                epochs
            );
        }

        let (weights, biases) = learners.into_iter().map(BinaryLearner::finish).unzip();
        info!(
            "Fitted linear SGD over {} classes in {:.2?}",
            classes.len(),
            start.elapsed()
        );

        Ok(FittedClassifier::LinearSgd(SgdModel {
            classes,
            weights,
            biases,
        }))
    }
}

/// One-vs-rest learner for a single class.
struct BinaryLearner {
    weights: Vec<f64>,
    scale: f64,
    bias: f64,
}

impl BinaryLearner {
    fn new(dimension: usize) -> Self {
        BinaryLearner {
            weights: vec![0.0; dimension],
            scale: 1.0,
            bias: 0.0,
        }
    }

    fn score(&self, sample: &[(usize, f64)]) -> f64 {
        let dot: f64 = sample
            .iter()
            .map(|&(index, value)| self.weights[index] * value)
            .sum();
        self.scale * dot + self.bias
    }

    /// One SGD update. Returns whether the sample violated the margin.
    fn step(&mut self, sample: &[(usize, f64)], target: f64, eta: f64, alpha: f64) -> bool {
        let margin = target * self.score(sample);

        self.scale *= 1.0 - eta * alpha;
        if self.scale < MIN_SCALE {
            self.fold_scale();
        }

        if margin < 1.0 {
            let update = eta * target / self.scale;
            for &(index, value) in sample {
                self.weights[index] += update * value;
            }
            self.bias += eta * target;
            true
        } else {
            false
        }
    }

    fn fold_scale(&mut self) {
        for weight in &mut self.weights {
            *weight *= self.scale;
        }
        self.scale = 1.0;
    }

    fn finish(mut self) -> (Vec<f64>, f64) {
        self.fold_scale();
        (self.weights, self.bias)
    }
}

/// A fitted one-vs-rest linear classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SgdModel {
    classes: Vec<Label>,
    weights: Vec<Vec<f64>>,
    biases: Vec<f64>,
}

impl SgdModel {
    /// Labels known to the model, ascending.
    pub fn classes(&self) -> &[Label] {
        &self.classes
    }

    fn decision(&self, class: usize, values: &[f64]) -> f64 {
        let dot: f64 = values
            .iter()
            .zip(&self.weights[class])
            .filter(|(value, _)| **value != 0.0)
            .map(|(value, weight)| value * weight)
            .sum();
        dot + self.biases[class]
    }
}

impl Classifier for SgdModel {
    fn predict(&self, matrix: &DesignMatrix) -> Result<Vec<Label>> {
        let dimension = self.weights.first().map_or(0, Vec::len);
        if matrix.dimension() != dimension {
            return Err(SentimentError::dimension_mismatch(dimension, matrix.dimension()));
        }

        let labels = matrix
            .rows()
            .iter()
            .map(|row| {
                let mut best = 0;
                let mut best_score = f64::NEG_INFINITY;
                for class in 0..self.classes.len() {
                    let score = self.decision(class, row.values());
                    // Strict comparison: ties go to the lowest label.
                    if score > best_score {
                        best = class;
                        best_score = score;
                    }
                }
                self.classes[best]
            })
            .collect();

        Ok(labels)
    }
}
