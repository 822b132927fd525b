//! Accuracy and confusion counts for predicted labels.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::corpus::Label;
use crate::error::{Result, SentimentError};

/// Agreement between predicted and gold labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub total: usize,
    pub correct: usize,
    /// `correct / total`, or 0 when there is nothing to score.
    pub accuracy: f64,
    /// Counts indexed by gold label, then predicted label.
    pub confusion: BTreeMap<Label, BTreeMap<Label, usize>>,
}

impl Evaluation {
    /// How often `gold` was predicted as `predicted`.
    pub fn count(&self, gold: Label, predicted: Label) -> usize {
        self.confusion
            .get(&gold)
            .and_then(|row| row.get(&predicted))
            .copied()
            .unwrap_or(0)
    }
}

/// Compare predictions with gold labels position by position.
pub fn evaluate(predicted: &[Label], gold: &[Label]) -> Result<Evaluation> {
    if predicted.len() != gold.len() {
        return Err(SentimentError::prediction(format!(
            "{} predictions for {} gold labels",
            predicted.len(),
            gold.len()
        )));
    }

    let mut confusion: BTreeMap<Label, BTreeMap<Label, usize>> = BTreeMap::new();
    let mut correct = 0;
    for (&p, &g) in predicted.iter().zip(gold) {
        if p == g {
            correct += 1;
        }
        *confusion.entry(g).or_default().entry(p).or_insert(0) += 1;
    }

    let total = gold.len();
    let accuracy = if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64
    };

    Ok(Evaluation {
        total,
        correct,
        accuracy,
        confusion,
    })
}
