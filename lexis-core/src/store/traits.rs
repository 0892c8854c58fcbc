//! Persistence traits for learned vocabulary and analysis results.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lexis_common::Result;
use serde::{Deserialize, Serialize};

use crate::lexicon::{AdaptiveLexicon, VersionedLexicon};
use crate::types::{Analysis, SentimentLabel};

/// A stored analysis, keyed by the caller's identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub identifier: String,
    pub text: String,
    pub analysis: Analysis,
    /// Label set by a moderator, overriding `analysis.label`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corrected_label: Option<SentimentLabel>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AnalysisRecord {
    /// Create a record with the current timestamp.
    pub fn new(identifier: impl Into<String>, text: impl Into<String>, analysis: Analysis) -> Self {
        let now = Utc::now();
        Self {
            identifier: identifier.into(),
            text: text.into(),
            analysis,
            corrected_label: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The label currently in effect.
    pub fn label(&self) -> SentimentLabel {
        self.corrected_label.unwrap_or(self.analysis.label)
    }
}

/// Backend holding the adaptive lexicon.
///
/// Versions start at 0 for an empty backend and increase by one per save.
#[async_trait]
pub trait AdaptiveStore: Send + Sync {
    /// Backend name (e.g., "sqlite", "memory")
    fn name(&self) -> &str;

    /// Load the current lexicon and its version.
    async fn load(&self) -> Result<VersionedLexicon>;

    /// Replace both term sets atomically.
    ///
    /// Fails with [`lexis_common::Error::Conflict`] when the stored version
    /// is not `expected_version`. Returns the new version.
    async fn save(&self, expected_version: u64, lexicon: &AdaptiveLexicon) -> Result<u64>;

    /// Whether the backend is operational.
    async fn health_check(&self) -> bool;
}

/// Backend holding analysis records.
#[async_trait]
pub trait ResultStore: Send + Sync {
    fn name(&self) -> &str;

    /// Store a record, replacing any record with the same identifier.
    async fn put(&self, record: AnalysisRecord) -> Result<()>;

    async fn get(&self, identifier: &str) -> Result<Option<AnalysisRecord>>;

    /// Overwrite the label of a stored record.
    ///
    /// Returns false if no record has that identifier.
    async fn relabel(&self, identifier: &str, label: SentimentLabel) -> Result<bool>;

    async fn count(&self) -> Result<usize>;
}
