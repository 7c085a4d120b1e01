//! Sentimeter Classifiers
//!
//! Sentiment classification for the prediction pipeline.
//!
//! Two strategies implement the same `predict` contract:
//! - A Candle model (embedding, pooling, dense, sigmoid) fed by a
//!   `tokenizers` tokenizer, used when model artifacts load at startup
//! - A keyword heuristic, used when no model is available and as the
//!   per-request fallback when inference fails
//!
//! All scores are in `[0.0, 1.0]` and the label is always `score > 0.5`.

pub mod analyzer;
pub mod classifier;
pub mod config;
pub mod heuristic;
pub mod model;
pub mod model_loader;

pub use analyzer::{AnalyzerMode, SentimentAnalyzer};
pub use classifier::{ClassificationMetadata, ClassificationResult, Classifier};
pub use config::{ClassifierConfig, DeviceSpec, ModelSourceSpec};
pub use heuristic::{KeywordCounts, KeywordHeuristic};
pub use model::{pad_sequence, ModelArchitecture, SequenceClassifier};
pub use model_loader::ModelArtifacts;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::analyzer::{AnalyzerMode, SentimentAnalyzer};
    pub use crate::classifier::{ClassificationResult, Classifier};
    pub use crate::config::ClassifierConfig;
    pub use crate::heuristic::KeywordHeuristic;
}
