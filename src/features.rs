//! Vocabulary construction and bag-of-words feature extraction.
//!
//! Training builds a [`Vocabulary`] from the tokenized corpus with a
//! [`VocabularyBuilder`], then a [`FeatureVectorizer`] maps each token
//! sequence onto a fixed-length [`FeatureVector`] indexed by that vocabulary.
//! The vocabulary is shared through an `Arc` so the vectorizer and the saved
//! model always agree on feature positions. The tf-idf mode additionally
//! weights each position by [`DocumentFrequencies`] counted on the training
//! corpus.

pub mod vectorizer;
pub mod vocabulary;
pub mod weighting;

pub use vectorizer::{DesignMatrix, FeatureVector, FeatureVectorizer, VectorMode};
pub use vocabulary::{FrequencyTable, Vocabulary, VocabularyBuilder};
pub use weighting::DocumentFrequencies;
