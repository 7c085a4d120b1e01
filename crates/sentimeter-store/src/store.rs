//! Feedback store
//!
//! Write-once, delete-only persistence of predictions. Every operation
//! checks a connection out of the pool for its own duration; `create` runs in
//! a transaction that rolls back when dropped uncommitted, so no error path
//! leaves a half-written row or a leaked connection.

use crate::config::DatabaseConfig;
use crate::error::{StoreError, StoreResult};
use crate::schema::Backend;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use sentimeter_core::{FeedbackRecord, Sentiment};
use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;
use std::time::Duration;
use tracing::{debug, error, info, warn};

const SELECT_COLUMNS: &str = "SELECT id, text, sentiment, score, created_at FROM feedbacks";

#[derive(Debug, sqlx::FromRow)]
struct FeedbackRow {
    id: i64,
    text: String,
    sentiment: String,
    score: f64,
    created_at: String,
}

impl TryFrom<FeedbackRow> for FeedbackRecord {
    type Error = StoreError;

    fn try_from(row: FeedbackRow) -> Result<Self, Self::Error> {
        let sentiment = row.sentiment.parse::<Sentiment>().map_err(|_| StoreError::Corrupt {
            id: row.id,
            reason: format!("unknown sentiment '{}'", row.sentiment),
        })?;

        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map_err(|e| StoreError::Corrupt {
                id: row.id,
                reason: format!("bad created_at '{}': {}", row.created_at, e),
            })?
            .with_timezone(&Utc);

        Ok(FeedbackRecord {
            id: row.id,
            text: row.text,
            sentiment,
            score: row.score,
            created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SentimentCountRow {
    sentiment: String,
    count: i64,
}

/// Per-label row counts taken in a single statement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SentimentCounts {
    pub total: u64,
    pub positive: u64,
    pub negative: u64,
}

#[derive(Clone)]
pub struct FeedbackStore {
    pool: AnyPool,
    backend: Backend,
}

impl FeedbackStore {
    /// Open a connection pool for the configured database
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let url = config.connection_url()?;
        let backend = Backend::from_url(&url)?;

        sqlx::any::install_default_drivers();

        let pool = AnyPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&url)
            .await?;

        info!(
            backend = backend.as_str(),
            url = %config.redacted_url(),
            "Connected to feedback database"
        );

        Ok(Self { pool, backend })
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Create the schema if it does not exist yet
    pub async fn migrate(&self) -> StoreResult<()> {
        for statement in self.backend.schema() {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("Feedback schema ready");
        Ok(())
    }

    /// Persist a prediction and return the stored record
    pub async fn create(
        &self,
        text: &str,
        sentiment: Sentiment,
        score: f64,
    ) -> StoreResult<FeedbackRecord> {
        track("create", async {
            let created_at = Utc::now().trunc_subsecs(6);

            let mut tx = self.pool.begin().await?;
            let result = sqlx::query(
                "INSERT INTO feedbacks (text, sentiment, score, created_at) VALUES (?, ?, ?, ?)",
            )
            .bind(text)
            .bind(sentiment.as_str())
            .bind(score)
            .bind(created_at.to_rfc3339_opts(SecondsFormat::Micros, true))
            .execute(&mut *tx)
            .await?;

            let id = result.last_insert_id().ok_or_else(|| {
                StoreError::Database(sqlx::Error::Protocol(
                    "database did not report the inserted id".to_string(),
                ))
            })?;
            tx.commit().await?;

            debug!(id, sentiment = %sentiment, score, "Stored feedback");

            Ok(FeedbackRecord {
                id,
                text: text.to_string(),
                sentiment,
                score,
                created_at,
            })
        })
        .await
    }

    pub async fn get_by_id(&self, id: i64) -> StoreResult<Option<FeedbackRecord>> {
        track("get_by_id", async {
            let row: Option<FeedbackRow> =
                sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE id = ?"))
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?;

            row.map(FeedbackRecord::try_from).transpose()
        })
        .await
    }

    /// All records in insertion order
    pub async fn list_all(&self) -> StoreResult<Vec<FeedbackRecord>> {
        track("list_all", async {
            let rows: Vec<FeedbackRow> = sqlx::query_as(&format!("{SELECT_COLUMNS} ORDER BY id"))
                .fetch_all(&self.pool)
                .await?;

            rows.into_iter().map(FeedbackRecord::try_from).collect()
        })
        .await
    }

    /// Records with exactly this label, in insertion order
    pub async fn list_by_sentiment(&self, sentiment: Sentiment) -> StoreResult<Vec<FeedbackRecord>> {
        track("list_by_sentiment", async {
            let rows: Vec<FeedbackRow> =
                sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE sentiment = ? ORDER BY id"))
                    .bind(sentiment.as_str())
                    .fetch_all(&self.pool)
                    .await?;

            rows.into_iter().map(FeedbackRecord::try_from).collect()
        })
        .await
    }

    /// Delete one record; `false` when no record had this id
    pub async fn delete_by_id(&self, id: i64) -> StoreResult<bool> {
        track("delete_by_id", async {
            let result = sqlx::query("DELETE FROM feedbacks WHERE id = ?")
                .bind(id)
                .execute(&self.pool)
                .await?;

            Ok(result.rows_affected() > 0)
        })
        .await
    }

    /// Delete every record; id assignment continues from where it was
    pub async fn delete_all(&self) -> StoreResult<u64> {
        track("delete_all", async {
            let result = sqlx::query("DELETE FROM feedbacks")
                .execute(&self.pool)
                .await?;

            info!(deleted = result.rows_affected(), "Deleted all feedback");
            Ok(result.rows_affected())
        })
        .await
    }

    /// Count rows per label
    pub async fn count_by_sentiment(&self) -> StoreResult<SentimentCounts> {
        track("count_by_sentiment", async {
            let rows: Vec<SentimentCountRow> = sqlx::query_as(
                "SELECT sentiment, COUNT(*) AS count FROM feedbacks GROUP BY sentiment",
            )
            .fetch_all(&self.pool)
            .await?;

            let mut counts = SentimentCounts::default();
            for row in rows {
                let count = row.count.max(0) as u64;
                match row.sentiment.parse::<Sentiment>() {
                    Ok(Sentiment::Positive) => counts.positive += count,
                    Ok(Sentiment::Negative) => counts.negative += count,
                    Err(_) => {
                        warn!(sentiment = %row.sentiment, count, "Skipping rows with unknown sentiment");
                        continue;
                    }
                }
                counts.total += count;
            }
            Ok(counts)
        })
        .await
    }

    /// Close the pool, waiting for checked-out connections to return
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

async fn track<T>(
    operation: &'static str,
    fut: impl std::future::Future<Output = StoreResult<T>>,
) -> StoreResult<T> {
    let result = fut.await;
    if let Err(e) = &result {
        error!(operation, "Feedback store operation failed: {}", e);
        metrics::counter!("sentimeter_store_errors_total", "operation" => operation).increment(1);
    }
    result
}
