//! Output formatting for CLI commands.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, SentimentArgs};
use crate::corpus::Label;
use crate::error::Result;
use crate::model::ModelMetadata;

/// Result of a training run.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainingResult {
    pub model_path: String,
    pub strategy: String,
    pub mode: String,
    pub vocabulary_size: usize,
    pub training_examples: usize,
    pub skipped_records: usize,
    pub duration_ms: u64,
}

/// Predicted labels, in input order.
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionResults {
    pub labels: Vec<Label>,
    pub duration_ms: u64,
}

/// Accuracy of a model on a labeled corpus.
#[derive(Debug, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub total: usize,
    pub correct: usize,
    pub accuracy: f64,
    pub skipped_records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confusion: Option<BTreeMap<Label, BTreeMap<Label, usize>>>,
}

/// What a saved model contains.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelSummary {
    pub path: String,
    pub metadata: ModelMetadata,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tokens: Vec<String>,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &SentimentArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &SentimentArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }

    let value = serde_json::to_value(result)?;
    for line in human_lines(&value, 0) {
        println!("{line}");
    }
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &SentimentArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Render a JSON value as indented `key: value` lines.
fn human_lines(value: &serde_json::Value, depth: usize) -> Vec<String> {
    let indent = "  ".repeat(depth);
    let mut lines = Vec::new();

    match value {
        serde_json::Value::Object(map) => {
            for (key, field) in map {
                let label = key.replace('_', " ");
                match field {
                    serde_json::Value::Object(_) => {
                        lines.push(format!("{indent}{label}:"));
                        lines.extend(human_lines(field, depth + 1));
                    }
                    serde_json::Value::Array(items) if items.iter().any(|i| i.is_object()) => {
                        lines.push(format!("{indent}{label}:"));
                        lines.extend(human_lines(field, depth + 1));
                    }
                    _ => lines.push(format!("{indent}{label}: {}", scalar(field))),
                }
            }
        }
        serde_json::Value::Array(items) => {
            for item in items {
                lines.extend(human_lines(item, depth));
            }
        }
        other => lines.push(format!("{indent}{}", scalar(other))),
    }

    lines
}

fn scalar(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        serde_json::Value::Number(number) => match number.as_f64() {
            Some(float) if number.is_f64() => format!("{float:.4}"),
            _ => number.to_string(),
        },
        serde_json::Value::Array(items) => items.iter().map(scalar).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}
