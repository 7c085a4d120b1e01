//! Backend detection and table definitions

use crate::error::{StoreError, StoreResult};

/// Table holding one row per prediction
pub const FEEDBACK_TABLE: &str = "feedbacks";

/// Relational backend behind the Any pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    MySql,
    Sqlite,
}

impl Backend {
    /// Detect the backend from a connection URL scheme
    pub fn from_url(url: &str) -> StoreResult<Self> {
        let scheme = url.split_once(':').map(|(scheme, _)| scheme).unwrap_or("");
        match scheme.to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(Self::MySql),
            "sqlite" => Ok(Self::Sqlite),
            _ => Err(StoreError::UnsupportedBackend(scheme.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::Sqlite => "sqlite",
        }
    }

    /// Idempotent DDL statements creating the schema.
    ///
    /// Both definitions keep ids monotonic across deletes: SQLite through
    /// `AUTOINCREMENT`, MySQL through InnoDB's `AUTO_INCREMENT` counter.
    pub fn schema(&self) -> &'static [&'static str] {
        match self {
            Self::MySql => &[r#"
CREATE TABLE IF NOT EXISTS feedbacks (
    id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
    text VARCHAR(1000) NOT NULL,
    sentiment VARCHAR(10) NOT NULL,
    score DOUBLE NOT NULL,
    created_at VARCHAR(40) NOT NULL,
    INDEX idx_feedbacks_sentiment (sentiment)
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4
"#],
            Self::Sqlite => &[
                r#"
CREATE TABLE IF NOT EXISTS feedbacks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    text TEXT NOT NULL,
    sentiment VARCHAR(10) NOT NULL,
    score DOUBLE NOT NULL,
    created_at VARCHAR(40) NOT NULL
)
"#,
                "CREATE INDEX IF NOT EXISTS idx_feedbacks_sentiment ON feedbacks (sentiment)",
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_url() {
        assert_eq!(
            Backend::from_url("mysql://root:pw@mysql/sentiment_db").unwrap(),
            Backend::MySql
        );
        assert_eq!(Backend::from_url("sqlite://feedback.db").unwrap(), Backend::Sqlite);
        assert_eq!(Backend::from_url("sqlite::memory:").unwrap(), Backend::Sqlite);
        assert!(matches!(
            Backend::from_url("postgres://localhost/db"),
            Err(StoreError::UnsupportedBackend(s)) if s == "postgres"
        ));
        assert!(Backend::from_url("not a url").is_err());
    }

    #[test]
    fn test_schema_targets_feedback_table() {
        for backend in [Backend::MySql, Backend::Sqlite] {
            assert!(backend.schema()[0].contains(FEEDBACK_TABLE));
        }
    }
}
