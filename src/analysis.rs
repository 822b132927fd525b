//! Text analysis for sentiment phrases.
//!
//! Only tokenization lives here; vocabulary and feature extraction are in
//! [`crate::features`].

pub mod tokenizer;

pub use tokenizer::{PhraseTokenizer, Tokenizer};
