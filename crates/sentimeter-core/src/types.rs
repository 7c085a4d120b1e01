//! Core types for Sentimeter

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Scores strictly above this value are labelled positive.
pub const POSITIVE_THRESHOLD: f64 = 0.5;

/// Maximum number of characters accepted for a single feedback text.
pub const MAX_TEXT_CHARS: usize = 1000;

/// Binary sentiment label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
}

impl Sentiment {
    /// Derive the label from a confidence score using the `> 0.5` rule
    pub fn from_score(score: f64) -> Self {
        if score > POSITIVE_THRESHOLD {
            Self::Positive
        } else {
            Self::Negative
        }
    }

    /// Canonical capitalized form, as stored and serialized
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive parsing; anything other than positive/negative is rejected.
impl FromStr for Sentiment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("positive") {
            Ok(Self::Positive)
        } else if s.eq_ignore_ascii_case("negative") {
            Ok(Self::Negative)
        } else {
            Err(Error::validation(
                "Sentiment must be 'positive' or 'negative'",
            ))
        }
    }
}

/// Outcome of a single prediction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub sentiment: Sentiment,
    pub score: f64,
}

impl Prediction {
    /// Build a prediction from a raw score.
    ///
    /// The score is clamped into `[0.0, 1.0]` (NaN becomes `0.0`) and the
    /// label is derived from the clamped value, so the label/score invariant
    /// always holds.
    pub fn from_score(score: f64) -> Self {
        let score = if score.is_nan() {
            0.0
        } else {
            score.clamp(0.0, 1.0)
        };

        Self {
            sentiment: Sentiment::from_score(score),
            score,
        }
    }
}

/// One persisted prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: i64,
    pub text: String,
    pub sentiment: Sentiment,
    pub score: f64,
    pub created_at: DateTime<Utc>,
}
