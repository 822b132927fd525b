//! Command line argument parsing for the phrase-sentiment CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::classifier::StrategyKind;
use crate::corpus::{ColumnRef, TsvOptions};
use crate::features::VectorMode;

/// phrase-sentiment - Train and apply bag-of-words sentiment classifiers
#[derive(Parser, Debug, Clone)]
#[command(name = "phrase-sentiment")]
#[command(about = "Train and apply bag-of-words sentiment classifiers on phrase corpora")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct SentimentArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl SentimentArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train a model on a labeled TSV corpus
    Train(TrainArgs),

    /// Predict a label for every phrase of a TSV file
    Predict(PredictArgs),

    /// Score a model against a labeled TSV corpus
    Evaluate(EvaluateArgs),

    /// Show what a saved model contains
    Inspect(InspectArgs),
}

/// Column layout of a TSV input.
#[derive(Args, Debug, Clone)]
pub struct ColumnArgs {
    /// Column holding the phrase text (header name or zero-based index)
    #[arg(long, default_value = "Phrase")]
    pub text_column: ColumnRef,

    /// The file has no header row
    #[arg(long)]
    pub no_header: bool,
}

/// Arguments for training
#[derive(Args, Debug, Clone)]
pub struct TrainArgs {
    /// Labeled training file
    pub corpus: PathBuf,

    /// Where to write the model (defaults to `<strategy>.model`)
    #[arg(short, long)]
    pub model: Option<PathBuf>,

    /// JSON training configuration; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Minimum occurrences for a token to enter the vocabulary
    #[arg(short, long)]
    pub trim: Option<usize>,

    /// Feature mode: binary, count or tfidf
    #[arg(long)]
    pub mode: Option<VectorMode>,

    /// Strategy: naive-bayes, bernoulli-naive-bayes, linear-sgd, random-forest
    /// or linear-regression
    #[arg(short, long)]
    pub strategy: Option<StrategyKind>,

    #[command(flatten)]
    pub columns: ColumnArgs,

    /// Column holding the integer label (header name or zero-based index)
    #[arg(long, default_value = "Sentiment")]
    pub label_column: ColumnRef,
}

/// Arguments for prediction
#[derive(Args, Debug, Clone)]
pub struct PredictArgs {
    /// Saved model
    pub model: PathBuf,

    /// File of phrases to classify
    pub input: PathBuf,

    /// Write one label per line here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub columns: ColumnArgs,
}

/// Arguments for evaluation
#[derive(Args, Debug, Clone)]
pub struct EvaluateArgs {
    /// Saved model
    pub model: PathBuf,

    /// Labeled file to score against
    pub corpus: PathBuf,

    #[command(flatten)]
    pub columns: ColumnArgs,

    /// Column holding the integer label (header name or zero-based index)
    #[arg(long, default_value = "Sentiment")]
    pub label_column: ColumnRef,

    /// Include the confusion counts in the output
    #[arg(long)]
    pub confusion: bool,
}

/// Arguments for inspecting a model
#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Saved model
    pub model: PathBuf,

    /// Also list the first N vocabulary tokens
    #[arg(long, default_value = "0")]
    pub tokens: usize,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

impl ColumnArgs {
    /// TSV layout with the given label column.
    pub fn tsv_options(&self, label_column: &ColumnRef) -> TsvOptions {
        TsvOptions {
            has_header: !self.no_header,
            text_column: self.text_column.clone(),
            label_column: label_column.clone(),
        }
    }

    /// TSV layout for files without a label column.
    pub fn text_options(&self) -> TsvOptions {
        TsvOptions {
            has_header: !self.no_header,
            text_column: self.text_column.clone(),
            ..TsvOptions::default()
        }
    }
}

impl TrainArgs {
    /// Model path, falling back to `<strategy>.model`.
    pub fn model_path(&self, strategy: StrategyKind) -> PathBuf {
        self.model
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("{strategy}.model")))
    }
}
