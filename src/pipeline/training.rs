//! Corpus to model.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::analysis::tokenizer::{PhraseTokenizer, Tokenizer};
use crate::classifier::{StrategyConfig, StrategyKind, distinct_labels};
use crate::corpus::{Corpus, CorpusSource, Label};
use crate::error::{Result, SentimentError};
use crate::features::{FeatureVectorizer, VectorMode, VocabularyBuilder};
use crate::model::{Model, ModelMetadata};

/// Settings for one training run.
///
/// Every field has a default, so a JSON file only needs the values it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Minimum token count for vocabulary inclusion.
    pub trim: usize,
    pub mode: VectorMode,
    pub strategy: StrategyKind,
    /// Hyperparameters passed to the strategy.
    pub strategy_config: StrategyConfig,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            trim: 1,
            mode: VectorMode::default(),
            strategy: StrategyKind::default(),
            strategy_config: StrategyConfig::default(),
        }
    }
}

impl TrainingConfig {
    /// Load a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: TrainingConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.trim == 0 {
            return Err(SentimentError::invalid_config("trim must be at least 1"));
        }
        if self.strategy_config.naive_bayes_alpha < 0.0 {
            return Err(SentimentError::invalid_config(
                "naive Bayes alpha must not be negative",
            ));
        }
        Ok(())
    }
}

/// Tokenizes a corpus, builds the vocabulary, vectorizes and fits a classifier.
pub struct TrainingPipeline {
    tokenizer: Arc<dyn Tokenizer>,
}

impl std::fmt::Debug for TrainingPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrainingPipeline")
            .field("tokenizer", &self.tokenizer.name())
            .finish()
    }
}

impl Default for TrainingPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainingPipeline {
    /// Create a pipeline using [`PhraseTokenizer`].
    pub fn new() -> Self {
        Self::with_tokenizer(Arc::new(PhraseTokenizer::new()))
    }

    pub fn with_tokenizer(tokenizer: Arc<dyn Tokenizer>) -> Self {
        TrainingPipeline { tokenizer }
    }

    /// Load `source` and train a model on it.
    pub fn train(&self, source: &dyn CorpusSource, config: &TrainingConfig) -> Result<Model> {
        config.validate()?;
        let start = Instant::now();

        info!("Loading corpus from {}", source.describe());
        let loaded = source.load()?;
        let (corpus, rejected) = Corpus::from_records(&loaded.records, self.tokenizer.as_ref());

        self.fit(corpus, loaded.skipped + rejected, config, start)
    }

    /// Train on an already tokenized corpus.
    pub fn train_corpus(&self, corpus: Corpus, config: &TrainingConfig) -> Result<Model> {
        config.validate()?;
        self.fit(corpus, 0, config, Instant::now())
    }

    fn fit(
        &self,
        corpus: Corpus,
        skipped: usize,
        config: &TrainingConfig,
        start: Instant,
    ) -> Result<Model> {
        let labels = corpus
            .phrases()
            .iter()
            .enumerate()
            .map(|(index, phrase)| {
                phrase.label().ok_or_else(|| {
                    SentimentError::invalid_corpus(format!("phrase {index} has no label"))
                })
            })
            .collect::<Result<Vec<Label>>>()?;

        let vocabulary = VocabularyBuilder::new(config.trim)?
            .with_require_non_empty(true)
            .build(&corpus)?;
        if vocabulary.is_empty() {
            warn!(
                "No token occurs at least {} times; the vocabulary is empty",
                config.trim
            );
        }
        let vocabulary = Arc::new(vocabulary);

        let mut vectorizer = FeatureVectorizer::new(config.mode);
        vectorizer.fit(Arc::clone(&vocabulary));
        if config.mode.uses_document_frequencies() {
            vectorizer.fit_document_frequencies(corpus.phrases())?;
        }
        let matrix = vectorizer.transform_batch(corpus.phrases())?;
        info!(
            "Vectorized {} phrases over {} features ({} mode)",
            matrix.n_rows(),
            matrix.dimension(),
            config.mode
        );

        let strategy = config.strategy.strategy(&config.strategy_config);
        let fit_start = Instant::now();
        let classifier = strategy.fit(&matrix, &labels).map_err(|e| match e {
            SentimentError::Training(_) => e,
            other => SentimentError::training(format!("{} failed: {other}", strategy.name())),
        })?;
        info!("Fitted {} in {:.2?}", strategy.name(), fit_start.elapsed());

        let metadata = ModelMetadata {
            strategy: config.strategy,
            mode: config.mode,
            trim: config.trim,
            vocabulary_size: vocabulary.len(),
            training_examples: corpus.len(),
            skipped_records: skipped,
            labels: distinct_labels(&labels),
            tokenizer: self.tokenizer.name().to_string(),
            training_time_ms: start.elapsed().as_millis() as u64,
            version: crate::VERSION.to_string(),
            trained_at: Utc::now(),
        };

        Ok(Model::new(&vectorizer, vocabulary, classifier, metadata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Classifier;
    use crate::corpus::{LabeledText, Phrase};

    #[test]
    fn test_train_records_metadata() {
        let corpus = vec![
            LabeledText::new("good movie", 4),
            LabeledText::new("bad film", 0),
            LabeledText::new("good film", 3),
        ];

        let model = TrainingPipeline::new()
            .train(&corpus, &TrainingConfig::default())
            .unwrap();

        let metadata = model.metadata();
        assert_eq!(metadata.strategy, StrategyKind::NaiveBayes);
        assert_eq!(metadata.vocabulary_size, 4);
        assert_eq!(metadata.training_examples, 3);
        assert_eq!(metadata.skipped_records, 0);
        assert_eq!(metadata.labels, vec![0, 3, 4]);
        assert_eq!(metadata.tokenizer, "phrase");
        assert_eq!(model.vocabulary().tokens(), ["good", "movie", "bad", "film"]);
    }

    #[test]
    fn test_empty_corpus_is_invalid() {
        let corpus: Vec<LabeledText> = Vec::new();
        let result = TrainingPipeline::new().train(&corpus, &TrainingConfig::default());

        assert!(matches!(result, Err(SentimentError::InvalidCorpus(_))));
    }

    #[test]
    fn test_trim_above_every_count_fails_in_training() {
        let corpus = vec![LabeledText::new("good movie", 4), LabeledText::new("bad", 0)];
        let config = TrainingConfig {
            trim: 10,
            ..Default::default()
        };

        let result = TrainingPipeline::new().train(&corpus, &config);
        assert!(matches!(result, Err(SentimentError::Training(_))));
    }

    #[test]
    fn test_unlabeled_phrase_is_rejected() {
        let corpus = Corpus::new(vec![Phrase::new(vec!["good".to_string()], None)]);
        let result = TrainingPipeline::new().train_corpus(corpus, &TrainingConfig::default());

        assert!(matches!(result, Err(SentimentError::InvalidCorpus(_))));
    }

    #[test]
    fn test_train_corpus_with_count_mode() {
        let corpus = Corpus::new(vec![
            Phrase::new(vec!["great".into(), "great".into()], Some(4)),
            Phrase::new(vec!["awful".into()], Some(0)),
        ]);
        let config = TrainingConfig {
            mode: VectorMode::Count,
            ..Default::default()
        };

        let model = TrainingPipeline::new().train_corpus(corpus, &config).unwrap();
        let matrix = model
            .vectorizer()
            .transform_batch(&[vec!["great".to_string()], vec!["awful".to_string()]])
            .unwrap();

        assert_eq!(model.mode(), VectorMode::Count);
        assert_eq!(model.classifier().predict(&matrix).unwrap(), vec![4, 0]);
    }

    #[test]
    fn test_train_corpus_with_tf_idf_mode() {
        let corpus = Corpus::new(vec![
            Phrase::new(vec!["a".into(), "witty".into(), "film".into()], Some(4)),
            Phrase::new(vec!["a".into(), "dull".into(), "film".into()], Some(0)),
            Phrase::new(vec!["witty".into()], Some(4)),
            Phrase::new(vec!["dull".into()], Some(0)),
        ]);
        let config = TrainingConfig {
            mode: VectorMode::TfIdf,
            ..Default::default()
        };

        let model = TrainingPipeline::new().train_corpus(corpus, &config).unwrap();

        let frequencies = model.document_frequencies().unwrap();
        assert_eq!(frequencies.documents(), 4);
        let witty = model.vocabulary().index_of("witty").unwrap();
        assert_eq!(frequencies.frequency(witty), Some(2));
        assert_eq!(model.metadata().mode, VectorMode::TfIdf);

        let matrix = model
            .vectorizer()
            .transform_batch(&[vec!["witty".to_string()], vec!["dull".to_string()]])
            .unwrap();
        assert_eq!(model.classifier().predict(&matrix).unwrap(), vec![4, 0]);
    }

    #[test]
    fn test_count_mode_stores_no_document_frequencies() {
        let corpus = vec![LabeledText::new("good", 4), LabeledText::new("bad", 0)];
        let config = TrainingConfig {
            mode: VectorMode::Count,
            ..Default::default()
        };

        let model = TrainingPipeline::new().train(&corpus, &config).unwrap();
        assert!(model.document_frequencies().is_none());
    }

    #[test]
    fn test_config_from_json() {
        let config: TrainingConfig =
            serde_json::from_str(r#"{"trim": 2, "strategy": "random-forest"}"#).unwrap();

        assert_eq!(config.trim, 2);
        assert_eq!(config.strategy, StrategyKind::RandomForest);
        assert_eq!(config.mode, VectorMode::Binary);

        let config: TrainingConfig = serde_json::from_str(r#"{"mode": "tfidf"}"#).unwrap();
        assert_eq!(config.mode, VectorMode::TfIdf);
    }

    #[test]
    fn test_zero_trim_config_is_invalid() {
        let config = TrainingConfig {
            trim: 0,
            ..Default::default()
        };

        assert!(matches!(
            config.validate(),
            Err(SentimentError::InvalidConfig(_))
        ));
    }
}
