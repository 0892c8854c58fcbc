//! Vocabulary learned from moderator corrections.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::types::SentimentLabel;

/// Learned positive and negative terms.
///
/// Append-only: terms are never removed. Ordered sets keep the serialized
/// form stable, so an unchanged lexicon always persists identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdaptiveLexicon {
    #[serde(default)]
    pub positive: BTreeSet<String>,
    #[serde(default)]
    pub negative: BTreeSet<String>,
}

impl AdaptiveLexicon {
    /// Terms learned for a label. Neutral corrections are never learned.
    pub fn terms(&self, label: SentimentLabel) -> Option<&BTreeSet<String>> {
        match label {
            SentimentLabel::Positive => Some(&self.positive),
            SentimentLabel::Negative => Some(&self.negative),
            SentimentLabel::Neutral => None,
        }
    }

    /// Insert a term. Returns false when the label cannot hold learned
    /// terms or the term is already present.
    pub fn insert(&mut self, label: SentimentLabel, term: impl Into<String>) -> bool {
        match label {
            SentimentLabel::Positive => self.positive.insert(term.into()),
            SentimentLabel::Negative => self.negative.insert(term.into()),
            SentimentLabel::Neutral => false,
        }
    }

    pub fn contains(&self, term: &str) -> bool {
        self.positive.contains(term) || self.negative.contains(term)
    }

    /// Total number of learned terms.
    pub fn len(&self) -> usize {
        self.positive.len() + self.negative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positive.is_empty() && self.negative.is_empty()
    }
}

/// An adaptive lexicon together with the backend version it was read at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionedLexicon {
    pub version: u64,
    pub lexicon: AdaptiveLexicon,
}
