//! Training, prediction and evaluation pipelines.
//!
//! # Examples
//!
//! ```
//! use phrase_sentiment::corpus::LabeledText;
//! use phrase_sentiment::pipeline::{PredictionPipeline, TrainingConfig, TrainingPipeline};
//!
//! # fn main() -> phrase_sentiment::error::Result<()> {
//! let corpus = vec![
//!     LabeledText::new("good movie", 4),
//!     LabeledText::new("bad film", 0),
//! ];
//!
//! let model = TrainingPipeline::new().train(&corpus, &TrainingConfig::default())?;
//! let labels = PredictionPipeline::new().predict(&model, &["good movie", "bad film"])?;
//! assert_eq!(labels, vec![4, 0]);
//! # Ok(())
//! # }
//! ```

pub mod evaluation;
pub mod prediction;
pub mod training;

pub use evaluation::{Evaluation, evaluate};
pub use prediction::PredictionPipeline;
pub use training::{TrainingConfig, TrainingPipeline};
