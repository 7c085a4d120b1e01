//! Keyword heuristic sentiment classifier
//!
//! This is a lexicon-based classifier used when no model is loaded, or when
//! inference fails for a single request. Scores carry a random offset so the
//! label is stable for a given text while the score is not.

use crate::classifier::{ClassificationResult, Classifier};
use aho_corasick::AhoCorasick;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sentimeter_core::Result;
use std::time::Instant;

const POSITIVE_WORDS: &[&str] = &[
    "good",
    "great",
    "excellent",
    "love",
    "amazing",
    "wonderful",
    "happy",
    "fantastic",
    "awesome",
    "best",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad",
    "terrible",
    "awful",
    "hate",
    "horrible",
    "worst",
    "sad",
    "angry",
    "disappointed",
    "poor",
];

/// Base score when positive markers win; the offset is added on top.
const POSITIVE_BASE: f64 = 0.7;
/// Base score when negative markers win; the offset is subtracted.
const NEGATIVE_BASE: f64 = 0.3;
/// Offsets are drawn from `[0, MAX_OFFSET)`.
const MAX_OFFSET: f64 = 0.3;

/// Counts of marker words found in a text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordCounts {
    pub positive: usize,
    pub negative: usize,
}

pub struct KeywordHeuristic {
    name: String,
    positive: AhoCorasick,
    negative: AhoCorasick,
    rng: Mutex<StdRng>,
}

impl KeywordHeuristic {
    pub fn new() -> Result<Self> {
        Self::with_rng("keyword-heuristic", StdRng::from_entropy())
    }

    /// Heuristic with a fixed random seed, for reproducible scores
    pub fn with_seed(seed: u64) -> Result<Self> {
        Self::with_rng("keyword-heuristic", StdRng::seed_from_u64(seed))
    }

    fn with_rng(name: impl Into<String>, rng: StdRng) -> Result<Self> {
        let positive = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(POSITIVE_WORDS)
            .map_err(|e| {
                sentimeter_core::Error::classifier(format!(
                    "Failed to build positive sentiment matcher: {e}"
                ))
            })?;

        let negative = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(NEGATIVE_WORDS)
            .map_err(|e| {
                sentimeter_core::Error::classifier(format!(
                    "Failed to build negative sentiment matcher: {e}"
                ))
            })?;

        Ok(Self {
            name: name.into(),
            positive,
            negative,
            rng: Mutex::new(rng),
        })
    }

    /// Count case-insensitive substring occurrences of each marker set.
    ///
    /// Overlapping markers each count, so "badisappointed" holds two.
    pub fn count(&self, text: &str) -> KeywordCounts {
        KeywordCounts {
            positive: self.positive.find_overlapping_iter(text).count(),
            negative: self.negative.find_overlapping_iter(text).count(),
        }
    }

    /// Score a text; the label is derived from the returned score
    pub fn score(&self, text: &str) -> f64 {
        let counts = self.count(text);
        let mut rng = self.rng.lock();

        let score = if counts.positive > counts.negative {
            POSITIVE_BASE + rng.gen_range(0.0..MAX_OFFSET)
        } else if counts.negative > counts.positive {
            NEGATIVE_BASE - rng.gen_range(0.0..MAX_OFFSET)
        } else {
            rng.gen_range(NEGATIVE_BASE..POSITIVE_BASE)
        };

        score.clamp(0.0, 1.0)
    }

    /// Synchronous classification; never fails
    pub fn predict(&self, text: &str) -> ClassificationResult {
        ClassificationResult::from_score(self.score(text)).with_model(self.name.clone())
    }
}

#[async_trait::async_trait]
impl Classifier for KeywordHeuristic {
    async fn classify(&self, text: &str) -> Result<ClassificationResult> {
        let start = Instant::now();
        let result = self.predict(text);
        Ok(result.with_latency_us(start.elapsed().as_micros() as u64))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
