//! Sentiment analyzer: model-backed prediction with heuristic fallback
//!
//! The analyzer is built once at startup and shared read-only by every
//! request. It never fails a prediction: a model that could not be loaded
//! selects [`SentimentAnalyzer::HeuristicFallback`] for the process lifetime,
//! and an inference error falls back to the heuristic for that call only.

use crate::classifier::{ClassificationResult, Classifier};
use crate::config::ClassifierConfig;
use crate::heuristic::KeywordHeuristic;
use crate::model::SequenceClassifier;
use crate::model_loader::{self, ModelArtifacts};
use sentimeter_core::{Prediction, Result};
use std::fmt;
use tracing::{debug, info, warn};

/// Which strategy serves predictions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzerMode {
    Model,
    Heuristic,
}

impl AnalyzerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Heuristic => "heuristic",
        }
    }
}

impl fmt::Display for AnalyzerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub enum SentimentAnalyzer {
    /// A loaded classifier, with the heuristic standing by for inference errors
    ModelBacked {
        classifier: Box<dyn Classifier>,
        fallback: KeywordHeuristic,
    },

    /// No usable model; the heuristic serves every request
    HeuristicFallback(KeywordHeuristic),
}

impl SentimentAnalyzer {
    /// Build the analyzer from configuration.
    ///
    /// Model loading problems are logged and select the heuristic; the only
    /// error returned is a failure to build the heuristic itself.
    pub fn load(config: &ClassifierConfig) -> Result<Self> {
        let fallback = match config.seed {
            Some(seed) => KeywordHeuristic::with_seed(seed)?,
            None => KeywordHeuristic::new()?,
        };

        match Self::load_model(config) {
            Ok(Some(classifier)) => {
                info!("Sentiment model '{}' active", classifier.name());
                Ok(Self::model_backed(Box::new(classifier), fallback))
            }
            Ok(None) => {
                info!("No sentiment model configured, using keyword heuristic");
                Ok(Self::HeuristicFallback(fallback))
            }
            Err(e) => {
                warn!("Failed to load sentiment model, using keyword heuristic: {}", e);
                metrics::counter!("sentimeter_fallback_total", "reason" => "load").increment(1);
                Ok(Self::HeuristicFallback(fallback))
            }
        }
    }

    fn load_model(config: &ClassifierConfig) -> Result<Option<SequenceClassifier>> {
        let Some(artifacts) = ModelArtifacts::resolve(&config.source)? else {
            return Ok(None);
        };
        let device = model_loader::create_device(config.device)?;
        SequenceClassifier::load(&artifacts, config.max_len, device).map(Some)
    }

    /// Analyzer backed by an arbitrary classifier
    pub fn model_backed(classifier: Box<dyn Classifier>, fallback: KeywordHeuristic) -> Self {
        Self::ModelBacked {
            classifier,
            fallback,
        }
    }

    /// Analyzer that only uses the heuristic
    pub fn heuristic(fallback: KeywordHeuristic) -> Self {
        Self::HeuristicFallback(fallback)
    }

    pub fn mode(&self) -> AnalyzerMode {
        match self {
            Self::ModelBacked { .. } => AnalyzerMode::Model,
            Self::HeuristicFallback(_) => AnalyzerMode::Heuristic,
        }
    }

    /// Predict the sentiment of `text`. Never fails.
    pub async fn predict(&self, text: &str) -> Prediction {
        let (result, mode) = match self {
            Self::ModelBacked {
                classifier,
                fallback,
            } => match classifier.classify(text).await {
                Ok(result) => (result, AnalyzerMode::Model),
                Err(e) => {
                    warn!(
                        "Inference with '{}' failed, using keyword heuristic: {}",
                        classifier.name(),
                        e
                    );
                    metrics::counter!("sentimeter_fallback_total", "reason" => "inference")
                        .increment(1);
                    (fallback.predict(text), AnalyzerMode::Heuristic)
                }
            },
            Self::HeuristicFallback(heuristic) => {
                (heuristic.predict(text), AnalyzerMode::Heuristic)
            }
        };

        record(&result, mode);

        // Re-derive from the score so the label invariant holds for any classifier.
        Prediction::from_score(result.score)
    }
}

fn record(result: &ClassificationResult, mode: AnalyzerMode) {
    debug!(
        sentiment = %result.sentiment,
        score = result.score,
        mode = %mode,
        latency_us = result.latency_us,
        "Prediction complete"
    );
    metrics::counter!(
        "sentimeter_predictions_total",
        "sentiment" => result.sentiment.as_str(),
        "mode" => mode.as_str()
    )
    .increment(1);
    metrics::histogram!("sentimeter_inference_latency_us").record(result.latency_us as f64);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelSourceSpec;
    use sentimeter_core::Sentiment;
    use std::path::PathBuf;

    #[test]
    fn test_no_model_selects_heuristic() {
        let analyzer = SentimentAnalyzer::load(&ClassifierConfig::default()).unwrap();
        assert_eq!(analyzer.mode(), AnalyzerMode::Heuristic);
    }

    #[test]
    fn test_missing_model_does_not_fail() {
        let config = ClassifierConfig {
            source: ModelSourceSpec::Local {
                dir: PathBuf::from("/nonexistent/sentiment-model"),
            },
            ..Default::default()
        };

        let analyzer = SentimentAnalyzer::load(&config).unwrap();
        assert_eq!(analyzer.mode(), AnalyzerMode::Heuristic);
    }

    #[tokio::test]
    async fn test_heuristic_prediction_on_positive_text() {
        let analyzer = SentimentAnalyzer::load(&ClassifierConfig::default().with_seed(5)).unwrap();
        let prediction = analyzer.predict("I love this product!").await;

        assert_eq!(prediction.sentiment, Sentiment::Positive);
        assert!((0.7..=1.0).contains(&prediction.score));
    }
}
