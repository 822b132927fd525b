//! Error types for the phrase-sentiment library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`SentimentError`] enum. The first four variants form the pipeline error
//! taxonomy; the remaining ones cover I/O, parsing and persistence.
//!
//! # Examples
//!
//! ```
//! use phrase_sentiment::error::{Result, SentimentError};
//!
//! fn require_trim(trim: usize) -> Result<usize> {
//!     if trim == 0 {
//!         return Err(SentimentError::invalid_config("trim must be at least 1"));
//!     }
//!     Ok(trim)
//! }
//!
//! assert!(require_trim(0).is_err());
//! assert_eq!(require_trim(3).unwrap(), 3);
//! ```

use std::io;

use thiserror::Error;

/// The main error type for phrase-sentiment operations.
#[derive(Error, Debug)]
pub enum SentimentError {
    /// Malformed or empty training input.
    #[error("Invalid corpus: {0}")]
    InvalidCorpus(String),

    /// A vectorizer or model was used before it was trained.
    #[error("Not fitted: {0}")]
    NotFitted(String),

    /// The underlying classifier failed to fit.
    #[error("Training error: {0}")]
    Training(String),

    /// A feature vector does not match the vocabulary it should be indexed by.
    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// The classifier failed while predicting.
    #[error("Prediction error: {0}")]
    Prediction(String),

    /// I/O errors (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Tab-separated input could not be read.
    #[error("TSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Binary model encoding or decoding failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A model artifact failed its integrity checks.
    #[error("Corrupt model artifact: {0}")]
    Corrupt(String),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Not supported yet.
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

/// Result type alias for operations that may fail with SentimentError.
pub type Result<T> = std::result::Result<T, SentimentError>;

impl SentimentError {
    /// Create a new invalid corpus error.
    pub fn invalid_corpus<S: Into<String>>(msg: S) -> Self {
        SentimentError::InvalidCorpus(msg.into())
    }

    /// Create a new not fitted error.
    pub fn not_fitted<S: Into<String>>(msg: S) -> Self {
        SentimentError::NotFitted(msg.into())
    }

    /// Create a new training error.
    pub fn training<S: Into<String>>(msg: S) -> Self {
        SentimentError::Training(msg.into())
    }

    /// Create a new dimension mismatch error.
    pub fn dimension_mismatch(expected: usize, found: usize) -> Self {
        SentimentError::DimensionMismatch { expected, found }
    }

    /// Create a new prediction error.
    pub fn prediction<S: Into<String>>(msg: S) -> Self {
        SentimentError::Prediction(msg.into())
    }

    /// Create a new serialization error.
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        SentimentError::Serialization(msg.into())
    }

    /// Create a new corrupt artifact error.
    pub fn corrupt<S: Into<String>>(msg: S) -> Self {
        SentimentError::Corrupt(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        SentimentError::InvalidConfig(msg.into())
    }

    /// Create a new unsupported error.
    pub fn unsupported<S: Into<String>>(msg: S) -> Self {
        SentimentError::Unsupported(msg.into())
    }
}
