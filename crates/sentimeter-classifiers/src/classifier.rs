//! Classifier trait and common types

use async_trait::async_trait;
use sentimeter_core::{Prediction, Result, Sentiment};

/// Trait for all sentiment classifiers
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify the given text
    async fn classify(&self, text: &str) -> Result<ClassificationResult>;

    /// Get the classifier name
    fn name(&self) -> &str;
}

/// Result of classification
#[derive(Debug, Clone)]
pub struct ClassificationResult {
    /// Derived label
    pub sentiment: Sentiment,

    /// Confidence score (0.0-1.0)
    pub score: f64,

    /// Additional metadata
    pub metadata: ClassificationMetadata,

    /// Latency in microseconds
    pub latency_us: u64,
}

impl ClassificationResult {
    /// Create a result from a raw score, clamping it and deriving the label
    pub fn from_score(score: f64) -> Self {
        let prediction = Prediction::from_score(score);
        Self {
            sentiment: prediction.sentiment,
            score: prediction.score,
            metadata: ClassificationMetadata::default(),
            latency_us: 0,
        }
    }

    /// Attach the producing model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.metadata.model = Some(model.into());
        self
    }

    /// Record the measured latency
    pub fn with_latency_us(mut self, latency_us: u64) -> Self {
        self.latency_us = latency_us;
        self
    }

    /// Collapse to the label/score pair returned to callers
    pub fn prediction(&self) -> Prediction {
        Prediction {
            sentiment: self.sentiment,
            score: self.score,
        }
    }
}

/// Metadata about classification
#[derive(Debug, Clone, Default)]
pub struct ClassificationMetadata {
    /// Model name or version
    pub model: Option<String>,
}
