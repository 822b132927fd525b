//! Command implementations for the phrase-sentiment CLI.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::time::Instant;

use anyhow::{Context, Result};
use log::info;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::corpus::{CorpusSource, TsvCorpusReader, read_unlabeled};
use crate::pipeline::{PredictionPipeline, TrainingConfig, TrainingPipeline};
use crate::storage::{FileModelStore, ModelStore};

/// Execute a CLI command.
pub fn execute_command(args: SentimentArgs) -> Result<()> {
    match &args.command {
        Command::Train(train_args) => train(train_args, &args),
        Command::Predict(predict_args) => predict(predict_args, &args),
        Command::Evaluate(evaluate_args) => evaluate(evaluate_args, &args),
        Command::Inspect(inspect_args) => inspect(inspect_args, &args),
    }
}

/// Resolve the training configuration: file first, then flag overrides.
fn training_config(args: &TrainArgs) -> Result<TrainingConfig> {
    let mut config = match &args.config {
        Some(path) => TrainingConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => TrainingConfig::default(),
    };

    if let Some(trim) = args.trim {
        config.trim = trim;
    }
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if let Some(strategy) = args.strategy {
        config.strategy = strategy;
    }
    config.validate()?;
    Ok(config)
}

/// Train a model and save it.
fn train(args: &TrainArgs, cli_args: &SentimentArgs) -> Result<()> {
    let start = Instant::now();
    let config = training_config(args)?;
    let model_path = args.model_path(config.strategy);

    if cli_args.verbosity() > 1 {
        println!(
            "Training {} ({} mode, trim {}) on {}",
            config.strategy,
            config.mode,
            config.trim,
            args.corpus.display()
        );
    }

    let reader = TsvCorpusReader::new(
        &args.corpus,
        args.columns.tsv_options(&args.label_column),
    );
    let model = TrainingPipeline::new()
        .train(&reader, &config)
        .with_context(|| format!("training on {} failed", args.corpus.display()))?;

    FileModelStore::new(&model_path)
        .save(&model)
        .with_context(|| format!("failed to save model to {}", model_path.display()))?;

    let metadata = model.metadata();
    let result = TrainingResult {
        model_path: model_path.display().to_string(),
        strategy: metadata.strategy.to_string(),
        mode: metadata.mode.to_string(),
        vocabulary_size: metadata.vocabulary_size,
        training_examples: metadata.training_examples,
        skipped_records: metadata.skipped_records,
        duration_ms: start.elapsed().as_millis() as u64,
    };

    output_result("Training completed", &result, cli_args)?;
    Ok(())
}

/// Predict labels for an unlabeled file.
fn predict(args: &PredictArgs, cli_args: &SentimentArgs) -> Result<()> {
    let start = Instant::now();
    let model = FileModelStore::new(&args.model)
        .load()
        .with_context(|| format!("failed to load model {}", args.model.display()))?;

    let options = args.columns.text_options();
    let texts = read_unlabeled(&args.input, &options)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let labels = PredictionPipeline::new().predict(&model, &texts)?;

    if let Some(path) = &args.output {
        let mut output = BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        );
        for label in &labels {
            writeln!(output, "{label}")?;
        }
        output.flush()?;
        info!("Wrote {} labels to {}", labels.len(), path.display());
    }

    match cli_args.output_format {
        OutputFormat::Json => {
            let result = PredictionResults {
                labels,
                duration_ms: start.elapsed().as_millis() as u64,
            };
            output_result("Prediction completed", &result, cli_args)?;
        }
        OutputFormat::Human if args.output.is_none() => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            for label in &labels {
                writeln!(out, "{label}")?;
            }
        }
        OutputFormat::Human => {
            if cli_args.verbosity() > 0 {
                println!("Predicted {} labels", labels.len());
            }
        }
    }

    Ok(())
}

/// Score a model on a labeled file.
fn evaluate(args: &EvaluateArgs, cli_args: &SentimentArgs) -> Result<()> {
    let model = FileModelStore::new(&args.model)
        .load()
        .with_context(|| format!("failed to load model {}", args.model.display()))?;

    let reader = TsvCorpusReader::new(
        &args.corpus,
        args.columns.tsv_options(&args.label_column),
    );
    let loaded = reader
        .load()
        .with_context(|| format!("failed to read {}", reader.describe()))?;

    let evaluation = PredictionPipeline::new().evaluate(&model, &loaded.records)?;
    let result = EvaluationResult {
        total: evaluation.total,
        correct: evaluation.correct,
        accuracy: evaluation.accuracy,
        skipped_records: loaded.skipped,
        confusion: args.confusion.then_some(evaluation.confusion),
    };

    output_result("Evaluation completed", &result, cli_args)?;
    Ok(())
}

/// Print a saved model's metadata.
fn inspect(args: &InspectArgs, cli_args: &SentimentArgs) -> Result<()> {
    let model = FileModelStore::new(&args.model)
        .load()
        .with_context(|| format!("failed to load model {}", args.model.display()))?;

    let summary = ModelSummary {
        path: args.model.display().to_string(),
        metadata: model.metadata().clone(),
        tokens: model
            .vocabulary()
            .tokens()
            .iter()
            .take(args.tokens)
            .cloned()
            .collect(),
    };

    output_result("Model", &summary, cli_args)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use tempfile::TempDir;

    use super::*;
    use crate::classifier::StrategyKind;
    use crate::features::VectorMode;

    fn parse(argv: &[&str]) -> SentimentArgs {
        SentimentArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.json");
        let mut file = File::create(&config_path).unwrap();
        write!(file, r#"{{"trim": 4, "mode": "count", "strategy": "random-forest"}}"#).unwrap();

        let args = parse(&[
            "phrase-sentiment",
            "train",
            "train.tsv",
            "--config",
            config_path.to_str().unwrap(),
            "--trim",
            "2",
        ]);
        let Command::Train(train_args) = args.command else {
            panic!("Expected Train command");
        };

        let config = training_config(&train_args).unwrap();
        assert_eq!(config.trim, 2);
        assert_eq!(config.mode, VectorMode::Count);
        assert_eq!(config.strategy, StrategyKind::RandomForest);
    }

    #[test]
    fn test_train_inspect_evaluate_predict() {
        let dir = TempDir::new().unwrap();
        let corpus = dir.path().join("train.tsv");
        std::fs::write(
            &corpus,
            "PhraseId\tSentenceId\tPhrase\tSentiment\n\
             1\t1\tgood movie\t4\n\
             2\t1\tbad film\t0\n",
        )
        .unwrap();
        let model = dir.path().join("nb.model");
        let labels = dir.path().join("labels.txt");

        execute_command(parse(&[
            "phrase-sentiment",
            "-q",
            "train",
            corpus.to_str().unwrap(),
            "--model",
            model.to_str().unwrap(),
        ]))
        .unwrap();
        assert!(model.exists());

        execute_command(parse(&[
            "phrase-sentiment",
            "-q",
            "--format",
            "json",
            "inspect",
            model.to_str().unwrap(),
        ]))
        .unwrap();

        execute_command(parse(&[
            "phrase-sentiment",
            "-q",
            "evaluate",
            model.to_str().unwrap(),
            corpus.to_str().unwrap(),
        ]))
        .unwrap();

        execute_command(parse(&[
            "phrase-sentiment",
            "-q",
            "predict",
            model.to_str().unwrap(),
            corpus.to_str().unwrap(),
            "--output",
            labels.to_str().unwrap(),
        ]))
        .unwrap();

        assert_eq!(std::fs::read_to_string(&labels).unwrap(), "4\n0\n");
    }

    #[test]
    fn test_missing_model_reports_path() {
        let args = parse(&["phrase-sentiment", "inspect", "/nonexistent/x.model"]);
        let error = execute_command(args).unwrap_err();

        assert!(format!("{error:#}").contains("/nonexistent/x.model"));
    }
}
