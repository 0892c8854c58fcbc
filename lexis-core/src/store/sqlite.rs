//! SQLite backend for both stores.
//!
//! Every operation opens its own connection inside `spawn_blocking`, so
//! several processes can share one database file. Adaptive saves run in an
//! `IMMEDIATE` transaction that checks and bumps the version row, which makes
//! the replace atomic and the version check race-free across processes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lexis_common::{Error, Result};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::traits::{AdaptiveStore, AnalysisRecord, ResultStore};
use crate::lexicon::{AdaptiveLexicon, VersionedLexicon};
use crate::types::SentimentLabel;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed adaptive lexicon and result store.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: PathBuf,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `db_path`.
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = connect(db_path)?;
        conn.execute_batch(include_str!("schema.sql"))
            .map_err(|e| storage("initializing schema", e))?;

        tracing::debug!(path = %db_path.display(), "SQLite store ready");
        Ok(Self {
            db_path: db_path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    async fn blocking<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = connect(&db_path)?;
            op(&mut conn)
        })
        .await
        .map_err(|e| Error::Internal(format!("SQLite task failed: {e}")))?
    }
}

fn connect(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path).map_err(|e| storage("opening database", e))?;
    conn.busy_timeout(BUSY_TIMEOUT)
        .map_err(|e| storage("setting busy timeout", e))?;
    Ok(conn)
}

fn storage(action: &str, e: rusqlite::Error) -> Error {
    Error::Storage(format!("{action}: {e}"))
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Storage(format!("invalid timestamp '{value}': {e}")))
}

#[async_trait]
impl AdaptiveStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn load(&self) -> Result<VersionedLexicon> {
        self.blocking(|conn| {
            let tx = conn
                .transaction()
                .map_err(|e| storage("starting read", e))?;

            let version: i64 = tx
                .query_row("SELECT version FROM adaptive_meta WHERE id = 1", [], |row| row.get(0))
                .map_err(|e| storage("reading lexicon version", e))?;

            let rows: Vec<(String, String)> = {
                let mut stmt = tx
                    .prepare("SELECT term, polarity FROM adaptive_terms")
                    .map_err(|e| storage("reading adaptive terms", e))?;
                let rows = stmt
                    .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
                    .map_err(|e| storage("reading adaptive terms", e))?;
                rows.collect::<std::result::Result<_, _>>()
                    .map_err(|e| storage("reading adaptive terms", e))?
            };
            tx.commit().map_err(|e| storage("finishing read", e))?;

            let mut lexicon = AdaptiveLexicon::default();
            for (term, polarity) in rows {
                let label: SentimentLabel = polarity
                    .parse()
                    .map_err(|_| Error::Storage(format!("invalid polarity '{polarity}' for '{term}'")))?;
                lexicon.insert(label, term);
            }

            Ok(VersionedLexicon {
                version: u64::try_from(version)
                    .map_err(|_| Error::Storage(format!("invalid lexicon version {version}")))?,
                lexicon,
            })
        })
        .await
    }

    async fn save(&self, expected_version: u64, lexicon: &AdaptiveLexicon) -> Result<u64> {
        let lexicon = lexicon.clone();
        self.blocking(move |conn| {
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(|e| storage("starting save", e))?;

            let current: i64 = tx
                .query_row("SELECT version FROM adaptive_meta WHERE id = 1", [], |row| row.get(0))
                .map_err(|e| storage("reading lexicon version", e))?;
            if u64::try_from(current).ok() != Some(expected_version) {
                return Err(Error::Conflict(format!(
                    "adaptive lexicon is at version {current}, expected {expected_version}"
                )));
            }

            tx.execute("DELETE FROM adaptive_terms", [])
                .map_err(|e| storage("clearing adaptive terms", e))?;
            {
                let mut insert = tx
                    .prepare("INSERT INTO adaptive_terms (term, polarity) VALUES (?1, ?2)")
                    .map_err(|e| storage("writing adaptive terms", e))?;
                for label in [SentimentLabel::Positive, SentimentLabel::Negative] {
                    for term in lexicon.terms(label).into_iter().flatten() {
                        insert
                            .execute(params![term, label.as_str()])
                            .map_err(|e| storage("writing adaptive terms", e))?;
                    }
                }
            }

            let next = current + 1;
            tx.execute(
                "UPDATE adaptive_meta SET version = ?1, updated_at = ?2 WHERE id = 1",
                params![next, Utc::now().to_rfc3339()],
            )
            .map_err(|e| storage("bumping lexicon version", e))?;
            tx.commit().map_err(|e| storage("committing save", e))?;

            Ok(next as u64)
        })
        .await
    }

    async fn health_check(&self) -> bool {
        self.blocking(|conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
                .map_err(|e| storage("health check", e))
        })
        .await
        .is_ok()
    }
}

#[async_trait]
impl ResultStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn put(&self, record: AnalysisRecord) -> Result<()> {
        let analysis = serde_json::to_string(&record.analysis)?;
        self.blocking(move |conn| {
            conn.execute(
                r"
                INSERT INTO analyses (identifier, text, analysis, corrected_label, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                ON CONFLICT(identifier) DO UPDATE SET
                    text = excluded.text,
                    analysis = excluded.analysis,
                    corrected_label = excluded.corrected_label,
                    updated_at = excluded.updated_at
                ",
                params![
                    record.identifier,
                    record.text,
                    analysis,
                    record.corrected_label.map(|label| label.as_str()),
                    record.created_at.to_rfc3339(),
                    record.updated_at.to_rfc3339(),
                ],
            )
            .map_err(|e| storage("storing analysis", e))?;
            Ok(())
        })
        .await
    }

    async fn get(&self, identifier: &str) -> Result<Option<AnalysisRecord>> {
        let identifier = identifier.to_string();
        let row = self
            .blocking(move |conn| {
                conn.query_row(
                    r"
                    SELECT identifier, text, analysis, corrected_label, created_at, updated_at
                    FROM analyses WHERE identifier = ?1
                    ",
                    params![identifier],
                    |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                            row.get::<_, Option<String>>(3)?,
                            row.get::<_, String>(4)?,
                            row.get::<_, String>(5)?,
                        ))
                    },
                )
                .optional()
                .map_err(|e| storage("reading analysis", e))
            })
            .await?;

        let Some((identifier, text, analysis, corrected_label, created_at, updated_at)) = row else {
            return Ok(None);
        };

        Ok(Some(AnalysisRecord {
            identifier,
            text,
            analysis: serde_json::from_str(&analysis)?,
            corrected_label: corrected_label.map(|label| label.parse()).transpose()?,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        }))
    }

    async fn relabel(&self, identifier: &str, label: SentimentLabel) -> Result<bool> {
        let identifier = identifier.to_string();
        self.blocking(move |conn| {
            let changed = conn
                .execute(
                    "UPDATE analyses SET corrected_label = ?1, updated_at = ?2 WHERE identifier = ?3",
                    params![label.as_str(), Utc::now().to_rfc3339(), identifier],
                )
                .map_err(|e| storage("relabeling analysis", e))?;
            Ok(changed > 0)
        })
        .await
    }

    async fn count(&self) -> Result<usize> {
        self.blocking(|conn| {
            let count: i64 = conn
                .query_row("SELECT COUNT(*) FROM analyses", [], |row| row.get(0))
                .map_err(|e| storage("counting analyses", e))?;
            Ok(count as usize)
        })
        .await
    }
}
