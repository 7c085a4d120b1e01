//! Sentimeter Core
//!
//! Core types and utilities shared across Sentimeter components.
//!
//! This crate provides:
//! - The binary sentiment label and its threshold rule
//! - Prediction and persisted feedback record types
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{FeedbackRecord, Prediction, Sentiment, MAX_TEXT_CHARS, POSITIVE_THRESHOLD};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{FeedbackRecord, Prediction, Sentiment};
}
