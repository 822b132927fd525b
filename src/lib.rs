//! # phrase-sentiment
//!
//! Phrase-level sentiment classification over bag-of-words features.
//!
//! ## Features
//!
//! - Whitespace tokenization with lowercase normalization
//! - Vocabulary building with a minimum-frequency threshold
//! - Binary or count feature vectors
//! - Interchangeable classifier strategies (naive Bayes, linear SGD,
//!   random forest, linear regression)
//! - Checksummed model artifacts
//!
//! ## Example
//!
//! ```
//! use phrase_sentiment::corpus::LabeledText;
//! use phrase_sentiment::pipeline::{PredictionPipeline, TrainingConfig, TrainingPipeline};
//!
//! let corpus = vec![
//!     LabeledText::new("a gorgeous , witty film", 4),
//!     LabeledText::new("dull and lifeless", 0),
//! ];
//! let model = TrainingPipeline::new()
//!     .train(&corpus, &TrainingConfig::default())
//!     .unwrap();
//!
//! let labels = PredictionPipeline::new()
//!     .predict(&model, &["witty", "lifeless"])
//!     .unwrap();
//! assert_eq!(labels, vec![4, 0]);
//! ```

pub mod analysis;
pub mod classifier;
pub mod cli;
pub mod corpus;
pub mod error;
pub mod features;
pub mod model;
pub mod pipeline;
pub mod storage;

pub mod prelude {
    pub use crate::analysis::{PhraseTokenizer, Tokenizer};
    pub use crate::classifier::{Classifier, ClassifierStrategy, StrategyConfig, StrategyKind};
    pub use crate::corpus::{Corpus, CorpusSource, Label, LabeledText, TsvCorpusReader};
    pub use crate::error::{Result, SentimentError};
    pub use crate::features::{FeatureVectorizer, VectorMode, Vocabulary, VocabularyBuilder};
    pub use crate::model::Model;
    pub use crate::pipeline::{PredictionPipeline, TrainingConfig, TrainingPipeline};
    pub use crate::storage::{FileModelStore, ModelStore};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
