//! Integration tests for training and prediction.

use std::io::Write;
use std::sync::Arc;

use phrase_sentiment::classifier::{StrategyConfig, StrategyKind};
use phrase_sentiment::corpus::{
    ColumnRef, Corpus, DataSplit, LabeledText, Phrase, TsvCorpusReader, TsvOptions,
};
use phrase_sentiment::error::{Result, SentimentError};
use phrase_sentiment::features::{FeatureVectorizer, VectorMode, VocabularyBuilder};
use phrase_sentiment::pipeline::{PredictionPipeline, TrainingConfig, TrainingPipeline};
use tempfile::NamedTempFile;

fn sentiment_corpus() -> Vec<LabeledText> {
    let positive = ["good movie", "great film", "good acting", "great story", "a good film"];
    let negative = ["bad movie", "awful film", "bad acting", "awful story", "a bad film"];

    let mut records = Vec::new();
    for _ in 0..4 {
        records.extend(positive.iter().map(|text| LabeledText::new(*text, 4)));
        records.extend(negative.iter().map(|text| LabeledText::new(*text, 0)));
    }
    records
}

fn phrase(tokens: &[&str], label: u32) -> Phrase {
    Phrase::new(tokens.iter().map(|t| t.to_string()).collect(), Some(label))
}

#[test]
fn test_vocabulary_and_binary_vector_scenario() -> Result<()> {
    let corpus = Corpus::new(vec![phrase(&["good", "movie"], 4), phrase(&["bad", "film"], 0)]);

    let vocabulary = VocabularyBuilder::new(1)?.build(&corpus)?;
    assert_eq!(vocabulary.tokens(), ["good", "movie", "bad", "film"]);

    let vectorizer = FeatureVectorizer::fitted(VectorMode::Binary, Arc::new(vocabulary));
    let vector = vectorizer.transform(&["good", "film"])?;
    assert_eq!(vector.values(), [1.0, 0.0, 0.0, 1.0]);

    Ok(())
}

#[test]
fn test_empty_corpus_requiring_vocabulary() {
    let result = VocabularyBuilder::new(1)
        .unwrap()
        .with_require_non_empty(true)
        .build(&Corpus::default());

    assert!(matches!(result, Err(SentimentError::InvalidCorpus(_))));
}

#[test]
fn test_transform_before_fit() {
    let vectorizer = FeatureVectorizer::new(VectorMode::Count);

    assert!(matches!(
        vectorizer.transform(&["good"]),
        Err(SentimentError::NotFitted(_))
    ));
}

#[test]
fn test_trim_keeps_tokens_reaching_threshold() -> Result<()> {
    let corpus = Corpus::new(vec![
        phrase(&["x", "y", "z"], 1),
        phrase(&["y", "z"], 2),
        phrase(&["z", "w"], 3),
    ]);

    let builder = VocabularyBuilder::new(2)?;
    let first = builder.build(&corpus)?;
    let second = builder.build(&corpus)?;

    assert_eq!(first.tokens(), ["y", "z"]);
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_count_vector_sums_in_vocabulary_occurrences() -> Result<()> {
    let corpus = Corpus::new(vec![phrase(&["good", "good", "film"], 4)]);
    let vocabulary = Arc::new(VocabularyBuilder::default().build(&corpus)?);
    let vectorizer = FeatureVectorizer::fitted(VectorMode::Count, vocabulary);

    let vector = vectorizer.transform(&["good", "unseen", "film", "good", "other"])?;
    let sum: f64 = vector.values().iter().sum();

    assert_eq!(sum, 3.0);
    Ok(())
}

#[test]
fn test_every_strategy_through_the_pipeline() -> Result<()> {
    let corpus = sentiment_corpus();
    let texts = ["good movie", "awful story", "", "completely new words"];

    for strategy in StrategyKind::ALL {
        let config = TrainingConfig {
            strategy,
            ..Default::default()
        };
        let model = TrainingPipeline::new().train(&corpus, &config)?;
        assert_eq!(model.strategy(), strategy);

        let labels = PredictionPipeline::new().predict(&model, &texts)?;
        assert_eq!(labels.len(), texts.len(), "{strategy}");
        assert!(labels.iter().all(|label| *label <= 4), "{strategy}");
    }

    Ok(())
}

#[test]
fn test_every_strategy_on_more_features_than_phrases() -> Result<()> {
    let corpus = vec![LabeledText::new("good movie", 4), LabeledText::new("bad film", 0)];
    let texts = ["good film", "bad movie", "unseen"];

    for strategy in StrategyKind::ALL {
        let config = TrainingConfig {
            strategy,
            ..Default::default()
        };

        match TrainingPipeline::new().train(&corpus, &config) {
            Ok(model) => {
                assert_eq!(model.dimension(), 4);
                let labels = PredictionPipeline::new().predict(&model, &texts)?;
                assert_eq!(labels.len(), texts.len(), "{strategy}");
            }
            Err(SentimentError::Training(_)) => {}
            Err(other) => panic!("{strategy}: unexpected error {other}"),
        }
    }

    Ok(())
}

#[test]
fn test_linear_regression_rejects_wide_single_class_corpus() {
    let corpus = vec![LabeledText::new("good movie", 3), LabeledText::new("fine film", 3)];
    let config = TrainingConfig {
        strategy: StrategyKind::LinearRegression,
        ..Default::default()
    };

    let result = TrainingPipeline::new().train(&corpus, &config);
    assert!(matches!(result, Err(SentimentError::Training(_))));
}

#[test]
fn test_tf_idf_naive_bayes_separates_sentiment() -> Result<()> {
    let config = TrainingConfig {
        mode: VectorMode::TfIdf,
        ..Default::default()
    };
    let model = TrainingPipeline::new().train(&sentiment_corpus(), &config)?;

    let labels =
        PredictionPipeline::new().predict(&model, &["great acting", "awful movie", "good story"])?;

    assert_eq!(labels, vec![4, 0, 4]);
    Ok(())
}

#[test]
fn test_naive_bayes_separates_sentiment() -> Result<()> {
    let model = TrainingPipeline::new().train(&sentiment_corpus(), &TrainingConfig::default())?;

    let labels =
        PredictionPipeline::new().predict(&model, &["great acting", "awful movie", "good story"])?;

    assert_eq!(labels, vec![4, 0, 4]);
    Ok(())
}

#[test]
fn test_training_is_repeatable() -> Result<()> {
    let corpus = sentiment_corpus();
    let texts: Vec<String> = corpus.iter().map(|record| record.text.clone()).collect();

    for strategy in [StrategyKind::NaiveBayes, StrategyKind::LinearSgd] {
        let config = TrainingConfig {
            strategy,
            mode: VectorMode::Count,
            ..Default::default()
        };
        let first = TrainingPipeline::new().train(&corpus, &config)?;
        let second = TrainingPipeline::new().train(&corpus, &config)?;

        assert_eq!(first.vocabulary(), second.vocabulary());
        let pipeline = PredictionPipeline::new();
        assert_eq!(
            pipeline.predict(&first, &texts)?,
            pipeline.predict(&second, &texts)?,
            "{strategy}"
        );
    }

    Ok(())
}

#[test]
fn test_single_class_corpus_fails_for_sgd() {
    let corpus = vec![LabeledText::new("good", 3), LabeledText::new("fine", 3)];
    let config = TrainingConfig {
        strategy: StrategyKind::LinearSgd,
        strategy_config: StrategyConfig::default(),
        ..Default::default()
    };

    let result = TrainingPipeline::new().train(&corpus, &config);
    assert!(matches!(result, Err(SentimentError::Training(_))));
}

#[test]
fn test_train_from_tsv_skips_malformed_rows() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    write!(
        file,
        "PhraseId\tSentenceId\tPhrase\tSentiment\n\
         1\t1\tgood movie\t4\n\
         2\t1\tbroken row\n\
         3\t1\tbad film\t0\n\
         4\t1\tnot a label\tx\n"
    )?;
    file.flush()?;

    let reader = TsvCorpusReader::new(file.path(), TsvOptions::default());
    let model = TrainingPipeline::new().train(&reader, &TrainingConfig::default())?;

    assert_eq!(model.metadata().training_examples, 2);
    assert_eq!(model.metadata().skipped_records, 2);
    assert_eq!(model.vocabulary().tokens(), ["good", "movie", "bad", "film"]);
    Ok(())
}

#[test]
fn test_train_from_headerless_tsv_by_position() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    write!(file, "great fun\t4\ntedious mess\t0\n")?;
    file.flush()?;

    let options = TsvOptions {
        has_header: false,
        text_column: ColumnRef::Index(0),
        label_column: ColumnRef::Index(1),
    };
    let reader = TsvCorpusReader::new(file.path(), options);
    let model = TrainingPipeline::new().train(&reader, &TrainingConfig::default())?;

    let labels = PredictionPipeline::new().predict(&model, &["great", "mess"])?;
    assert_eq!(labels, vec![4, 0]);
    Ok(())
}

#[test]
fn test_test_split_is_not_supported() -> Result<()> {
    let file = NamedTempFile::new()?;
    let reader = TsvCorpusReader::new(file.path(), TsvOptions::default()).with_split(DataSplit::Test);

    let result = TrainingPipeline::new().train(&reader, &TrainingConfig::default());
    assert!(matches!(result, Err(SentimentError::Unsupported(_))));
    Ok(())
}

#[test]
fn test_model_is_shared_across_threads() -> Result<()> {
    let model = Arc::new(TrainingPipeline::new().train(&sentiment_corpus(), &TrainingConfig::default())?);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let model = Arc::clone(&model);
            std::thread::spawn(move || {
                PredictionPipeline::new()
                    .predict(&model, &["good film", "bad film"])
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), vec![4, 0]);
    }
    Ok(())
}
