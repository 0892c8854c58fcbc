//! The sentiment engine: analysis over published snapshots and the feedback
//! learning loop.
//!
//! Readers take the current snapshot with a brief read lock and never wait on
//! learning. Learning is serialized by a writer mutex inside the process and
//! by optimistic versioning against the adaptive store across processes. A
//! new snapshot is published only after the store accepted the save.

use lexis_common::config::MIN_LEARNED_TOKEN_CHARS;
use lexis_common::{Config, Error, Result, ResultExt, ScoringConfig};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::analyzer::Analyzer;
use crate::learner::FeedbackLearner;
use crate::lexicon::{BuiltinLexicon, LexiconSnapshot, VersionedLexicon};
use crate::store::{AdaptiveStore, AnalysisRecord, ResultStore};
use crate::types::{Analysis, FeedbackEvent, SentimentLabel};

/// Save attempts per correction before a version conflict is surfaced.
pub const MAX_SAVE_ATTEMPTS: usize = 3;

/// Tunables the engine takes from configuration.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub scoring: ScoringConfig,
    pub min_learned_token_chars: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            min_learned_token_chars: MIN_LEARNED_TOKEN_CHARS,
        }
    }
}

impl EngineSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            scoring: config.scoring.clone(),
            min_learned_token_chars: config.lexicon.min_learned_token_chars,
        }
    }
}

/// What a correction did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackOutcome {
    pub identifier: String,
    pub label: SentimentLabel,
    /// Terms learned from this correction
    pub added_terms: Vec<String>,
    /// Adaptive lexicon version after the correction
    pub adaptive_version: u64,
    /// Whether the adaptive store was written
    pub persisted: bool,
    /// Whether a stored analysis was relabeled
    pub relabeled: bool,
}

/// Snapshot and the adaptive lexicon it was merged from, published together.
#[derive(Debug, Clone)]
struct Published {
    snapshot: Arc<LexiconSnapshot>,
    adaptive: Arc<VersionedLexicon>,
}

pub struct SentimentEngine {
    builtin: BuiltinLexicon,
    analyzer: Analyzer,
    learner: FeedbackLearner,
    adaptive_store: Arc<dyn AdaptiveStore>,
    results: Arc<dyn ResultStore>,
    published: RwLock<Published>,
    writer: Mutex<()>,
}

impl SentimentEngine {
    /// Load the adaptive lexicon and publish the first snapshot.
    pub async fn open(
        builtin: BuiltinLexicon,
        settings: EngineSettings,
        adaptive_store: Arc<dyn AdaptiveStore>,
        results: Arc<dyn ResultStore>,
    ) -> Result<Self> {
        let adaptive = adaptive_store
            .load()
            .await
            .context(format!("loading adaptive lexicon from {}", adaptive_store.name()))?;

        let published = Self::merge(&builtin, adaptive);
        tracing::info!(
            adaptive_store = adaptive_store.name(),
            result_store = results.name(),
            adaptive_version = published.adaptive.version,
            learned_terms = published.adaptive.lexicon.len(),
            lexicon_terms = published.snapshot.len(),
            "Sentiment engine ready"
        );

        Ok(Self {
            builtin,
            analyzer: Analyzer::new(settings.scoring),
            learner: FeedbackLearner::new(settings.min_learned_token_chars),
            adaptive_store,
            results,
            published: RwLock::new(published),
            writer: Mutex::new(()),
        })
    }

    fn merge(builtin: &BuiltinLexicon, adaptive: VersionedLexicon) -> Published {
        Published {
            snapshot: Arc::new(builtin.merge(&adaptive)),
            adaptive: Arc::new(adaptive),
        }
    }

    fn current(&self) -> Published {
        self.published.read().clone()
    }

    fn publish(&self, adaptive: VersionedLexicon) {
        let next = Self::merge(&self.builtin, adaptive);
        *self.published.write() = next;
    }

    /// The snapshot analyses currently run against.
    pub fn snapshot(&self) -> Arc<LexiconSnapshot> {
        Arc::clone(&self.published.read().snapshot)
    }

    /// The adaptive lexicon behind the current snapshot.
    pub fn adaptive(&self) -> Arc<VersionedLexicon> {
        Arc::clone(&self.published.read().adaptive)
    }

    pub fn scoring(&self) -> &ScoringConfig {
        self.analyzer.policy()
    }

    /// Analyze a text against the current snapshot. Nothing is stored.
    pub fn analyze(&self, text: &str) -> Analysis {
        let snapshot = self.snapshot();
        self.analyzer.analyze(&snapshot, text)
    }

    /// Analyze a text and store the result under `identifier`.
    pub async fn submit(&self, identifier: &str, text: &str) -> Result<Analysis> {
        if identifier.trim().is_empty() {
            return Err(Error::InvalidInput("identifier must not be empty".into()));
        }

        let analysis = self.analyze(text);
        self.results
            .put(AnalysisRecord::new(identifier, text, analysis.clone()))
            .await
            .context(format!("storing analysis '{identifier}'"))?;
        Ok(analysis)
    }

    /// Fetch a stored analysis.
    pub async fn record(&self, identifier: &str) -> Result<Option<AnalysisRecord>> {
        self.results.get(identifier).await
    }

    /// Apply a moderator correction.
    ///
    /// Unknown tokens of the corrected text are learned under the corrected
    /// label and persisted before the new snapshot is published, then the
    /// stored analysis is relabeled. A failed save leaves both the snapshot
    /// and the stored lexicon as they were.
    pub async fn feedback(&self, event: FeedbackEvent) -> Result<FeedbackOutcome> {
        if event.identifier.trim().is_empty() {
            return Err(Error::InvalidInput("identifier must not be empty".into()));
        }

        let _writer = self.writer.lock().await;
        let label = event.corrected_label;

        let mut attempt = 1;
        let (added_terms, adaptive_version, persisted) = loop {
            let current = self.current();
            let outcome = self.learner.learn(
                &current.snapshot,
                &current.adaptive.lexicon,
                &event.original_text,
                label,
            );
            if !outcome.changed() {
                break (Vec::new(), current.adaptive.version, false);
            }

            match self
                .adaptive_store
                .save(current.adaptive.version, &outcome.lexicon)
                .await
            {
                Ok(version) => {
                    self.publish(VersionedLexicon {
                        version,
                        lexicon: outcome.lexicon,
                    });
                    break (outcome.added, version, true);
                }
                Err(e) if e.is_conflict() && attempt < MAX_SAVE_ATTEMPTS => {
                    tracing::warn!(
                        identifier = %event.identifier,
                        attempt,
                        expected_version = current.adaptive.version,
                        "Adaptive lexicon changed underneath us, reloading"
                    );
                    self.refresh().await?;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(
                        identifier = %event.identifier,
                        attempt,
                        error = %e,
                        "Failed to persist learned terms"
                    );
                    return Err(e);
                }
            }
        };

        if persisted {
            tracing::info!(
                identifier = %event.identifier,
                label = %label,
                added = ?added_terms,
                adaptive_version,
                "Learned terms from feedback"
            );
        } else {
            tracing::debug!(identifier = %event.identifier, label = %label, "Feedback added no terms");
        }

        let relabeled = self
            .results
            .relabel(&event.identifier, label)
            .await
            .context(format!("relabeling analysis '{}'", event.identifier))?;
        if !relabeled {
            tracing::warn!(identifier = %event.identifier, "Feedback for an unknown analysis");
        }

        Ok(FeedbackOutcome {
            identifier: event.identifier,
            label,
            added_terms,
            adaptive_version,
            persisted,
            relabeled,
        })
    }

    /// Reload the adaptive lexicon from the store and republish.
    pub async fn reload(&self) -> Result<u64> {
        let _writer = self.writer.lock().await;
        self.refresh().await
    }

    async fn refresh(&self) -> Result<u64> {
        let adaptive = self.adaptive_store.load().await?;
        let version = adaptive.version;
        self.publish(adaptive);
        tracing::debug!(adaptive_version = version, "Adaptive lexicon reloaded");
        Ok(version)
    }

    /// Whether the adaptive store is reachable.
    pub async fn health_check(&self) -> bool {
        self.adaptive_store.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::{AdaptiveLexicon, LexiconDefinition};
    use crate::store::InMemoryStore;
    use std::collections::HashMap;

    fn builtin() -> BuiltinLexicon {
        BuiltinLexicon::new(LexiconDefinition {
            positive: vec!["good".into()],
            negative: vec!["bad".into(), "terrible".into()],
            neutral: vec!["okay".into()],
            weights: HashMap::from([("terrible".into(), 2.0)]),
        })
        .unwrap()
    }

    async fn engine_with(store: Arc<InMemoryStore>) -> SentimentEngine {
        SentimentEngine::open(
            builtin(),
            EngineSettings::default(),
            store.clone(),
            store,
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn open_merges_stored_lexicon() {
        let mut learned = AdaptiveLexicon::default();
        learned.insert(SentimentLabel::Positive, "zesty");
        let engine = engine_with(Arc::new(InMemoryStore::with_lexicon(learned))).await;

        assert_eq!(engine.adaptive().version, 1);
        assert_eq!(engine.snapshot().category_of("zesty"), Some(SentimentLabel::Positive));
        assert_eq!(engine.analyze("zesty").label, SentimentLabel::Positive);
    }

    #[tokio::test]
    async fn submit_stores_record() {
        let store = Arc::new(InMemoryStore::new());
        let engine = engine_with(store.clone()).await;

        let analysis = engine.submit("c-1", "terrible").await.unwrap();
        assert_eq!(analysis.score, -3.6);
        let record = engine.record("c-1").await.unwrap().unwrap();
        assert_eq!(record.analysis, analysis);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn submit_rejects_empty_identifier() {
        let engine = engine_with(Arc::new(InMemoryStore::new())).await;
        let err = engine.submit(" ", "good").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn feedback_learns_and_relabels() {
        let store = Arc::new(InMemoryStore::new());
        let engine = engine_with(store.clone()).await;
        engine.submit("c-1", "laggy and sluggish").await.unwrap();

        let outcome = engine
            .feedback(FeedbackEvent::new("c-1", "laggy and sluggish", SentimentLabel::Negative))
            .await
            .unwrap();

        assert!(outcome.persisted);
        assert!(outcome.relabeled);
        assert_eq!(outcome.adaptive_version, 1);
        assert_eq!(outcome.added_terms, ["laggy", "and", "sluggish"]);
        assert_eq!(engine.snapshot().category_of("laggy"), Some(SentimentLabel::Negative));
        assert_eq!(store.load().await.unwrap().lexicon.negative.len(), 3);

        let record = engine.record("c-1").await.unwrap().unwrap();
        assert_eq!(record.label(), SentimentLabel::Negative);
    }

    #[tokio::test]
    async fn feedback_for_unknown_record_still_learns() {
        let engine = engine_with(Arc::new(InMemoryStore::new())).await;
        let outcome = engine
            .feedback(FeedbackEvent::new("ghost", "zesty", SentimentLabel::Positive))
            .await
            .unwrap();
        assert!(outcome.persisted);
        assert!(!outcome.relabeled);
    }

    #[tokio::test]
    async fn reload_picks_up_external_changes() {
        let store = Arc::new(InMemoryStore::new());
        let engine = engine_with(store.clone()).await;

        let mut learned = AdaptiveLexicon::default();
        learned.insert(SentimentLabel::Negative, "laggy");
        store.save(0, &learned).await.unwrap();
        assert!(!engine.snapshot().contains("laggy"));

        assert_eq!(engine.reload().await.unwrap(), 1);
        assert!(engine.snapshot().contains("laggy"));
    }
}
