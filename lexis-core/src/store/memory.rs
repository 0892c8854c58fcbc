//! In-process backend for tests and ephemeral deployments.

use async_trait::async_trait;
use chrono::Utc;
use lexis_common::{Error, Result};
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::traits::{AdaptiveStore, AnalysisRecord, ResultStore};
use crate::lexicon::{AdaptiveLexicon, VersionedLexicon};
use crate::types::SentimentLabel;

/// Both stores held in memory. Nothing survives the process.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    adaptive: RwLock<VersionedLexicon>,
    records: RwLock<HashMap<String, AnalysisRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already learned lexicon at version 1.
    pub fn with_lexicon(lexicon: AdaptiveLexicon) -> Self {
        Self {
            adaptive: RwLock::new(VersionedLexicon { version: 1, lexicon }),
            records: RwLock::default(),
        }
    }
}

#[async_trait]
impl AdaptiveStore for InMemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn load(&self) -> Result<VersionedLexicon> {
        Ok(self.adaptive.read().await.clone())
    }

    async fn save(&self, expected_version: u64, lexicon: &AdaptiveLexicon) -> Result<u64> {
        let mut current = self.adaptive.write().await;
        if current.version != expected_version {
            return Err(Error::Conflict(format!(
                "adaptive lexicon is at version {}, expected {expected_version}",
                current.version
            )));
        }
        current.version += 1;
        current.lexicon = lexicon.clone();
        Ok(current.version)
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[async_trait]
impl ResultStore for InMemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn put(&self, record: AnalysisRecord) -> Result<()> {
        self.records
            .write()
            .await
            .insert(record.identifier.clone(), record);
        Ok(())
    }

    async fn get(&self, identifier: &str) -> Result<Option<AnalysisRecord>> {
        Ok(self.records.read().await.get(identifier).cloned())
    }

    async fn relabel(&self, identifier: &str, label: SentimentLabel) -> Result<bool> {
        let mut records = self.records.write().await;
        match records.get_mut(identifier) {
            Some(record) => {
                record.corrected_label = Some(label);
                record.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.records.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Analysis, WordStats};

    fn record(identifier: &str) -> AnalysisRecord {
        AnalysisRecord::new(
            identifier,
            "terrible",
            Analysis {
                label: SentimentLabel::Negative,
                score: -3.6,
                raw_score: -2.0,
                word_stats: WordStats {
                    negative: 1,
                    ..Default::default()
                },
                word_count: 1,
                interrogative: false,
            },
        )
    }

    #[tokio::test]
    async fn empty_store_is_version_zero() {
        let store = InMemoryStore::new();
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.version, 0);
        assert!(loaded.lexicon.is_empty());
        assert!(store.health_check().await);
    }

    #[tokio::test]
    async fn save_bumps_version() {
        let store = InMemoryStore::new();
        let mut lexicon = AdaptiveLexicon::default();
        lexicon.insert(SentimentLabel::Positive, "zesty");

        assert_eq!(store.save(0, &lexicon).await.unwrap(), 1);
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.version, 1);
        assert_eq!(loaded.lexicon, lexicon);
    }

    #[tokio::test]
    async fn stale_save_is_rejected() {
        let store = InMemoryStore::new();
        store.save(0, &AdaptiveLexicon::default()).await.unwrap();

        let mut lexicon = AdaptiveLexicon::default();
        lexicon.insert(SentimentLabel::Negative, "laggy");
        let err = store.save(0, &lexicon).await.unwrap_err();
        assert!(err.is_conflict());
        assert!(store.load().await.unwrap().lexicon.is_empty());
    }

    #[tokio::test]
    async fn records_put_get_relabel() {
        let store = InMemoryStore::new();
        store.put(record("c-1")).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 1);

        assert!(store.relabel("c-1", SentimentLabel::Neutral).await.unwrap());
        let stored = store.get("c-1").await.unwrap().unwrap();
        assert_eq!(stored.corrected_label, Some(SentimentLabel::Neutral));
        assert_eq!(stored.analysis.label, SentimentLabel::Negative);
        assert!(stored.updated_at >= stored.created_at);

        assert!(!store.relabel("missing", SentimentLabel::Positive).await.unwrap());
        assert!(store.get("missing").await.unwrap().is_none());
    }
}
