//! Sentimeter Store
//!
//! Durable storage for predictions and the statistics derived from them.
//!
//! Provides:
//! - A write-once, delete-only feedback store over a `sqlx` Any pool
//!   (MySQL in production, SQLite for local runs and tests)
//! - Schema creation for both backends
//! - On-demand aggregate statistics

pub mod config;
pub mod error;
pub mod schema;
pub mod stats;
pub mod store;

pub use config::DatabaseConfig;
pub use error::{StoreError, StoreResult};
pub use schema::Backend;
pub use stats::FeedbackStats;
pub use store::{FeedbackStore, SentimentCounts};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::DatabaseConfig;
    pub use crate::stats::{self, FeedbackStats};
    pub use crate::store::FeedbackStore;
}
