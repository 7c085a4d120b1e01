//! Aggregate statistics over stored feedback

use crate::error::StoreResult;
use crate::store::{FeedbackStore, SentimentCounts};
use serde::{Deserialize, Serialize};

/// Counts and percentages of stored predictions
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackStats {
    pub total_feedbacks: u64,
    pub positive: u64,
    pub negative: u64,
    pub positive_percentage: f64,
    pub negative_percentage: f64,
}

impl FeedbackStats {
    /// Derive percentages; an empty store yields zero for both
    pub fn from_counts(counts: SentimentCounts) -> Self {
        let percentage = |count: u64| {
            if counts.total > 0 {
                count as f64 / counts.total as f64 * 100.0
            } else {
                0.0
            }
        };

        Self {
            total_feedbacks: counts.total,
            positive: counts.positive,
            negative: counts.negative,
            positive_percentage: percentage(counts.positive),
            negative_percentage: percentage(counts.negative),
        }
    }
}

/// Compute statistics from the current store contents. Not cached.
pub async fn compute(store: &FeedbackStore) -> StoreResult<FeedbackStats> {
    let counts = store.count_by_sentiment().await?;
    Ok(FeedbackStats::from_counts(counts))
}
