//! Vocabulary learning from corrected labels.

use lexis_common::config::MIN_LEARNED_TOKEN_CHARS;

use crate::lexicon::{AdaptiveLexicon, LexiconSnapshot};
use crate::normalizer::normalize;
use crate::types::SentimentLabel;

/// Result of learning from one correction.
#[derive(Debug, Clone, PartialEq)]
pub struct LearnOutcome {
    pub lexicon: AdaptiveLexicon,
    /// Terms added by this correction, in text order
    pub added: Vec<String>,
}

impl LearnOutcome {
    pub fn changed(&self) -> bool {
        !self.added.is_empty()
    }
}

/// Extracts unknown tokens from corrected texts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackLearner {
    min_token_chars: usize,
}

impl FeedbackLearner {
    pub fn new(min_token_chars: usize) -> Self {
        Self { min_token_chars }
    }

    /// Learn the unknown tokens of `text` under `label`.
    ///
    /// A token is learned only when it is long enough and absent from every
    /// category of `snapshot` and from `adaptive`. The latter keeps a term
    /// from being learned under both polarities. Neutral corrections learn
    /// nothing.
    pub fn learn(
        &self,
        snapshot: &LexiconSnapshot,
        adaptive: &AdaptiveLexicon,
        text: &str,
        label: SentimentLabel,
    ) -> LearnOutcome {
        let mut lexicon = adaptive.clone();
        let mut added = Vec::new();

        if label == SentimentLabel::Neutral {
            return LearnOutcome { lexicon, added };
        }

        let normalized = normalize(text);
        for token in normalized.tokens() {
            if token.chars().count() < self.min_token_chars
                || snapshot.contains(token)
                || adaptive.contains(token)
            {
                continue;
            }
            if lexicon.insert(label, token) {
                added.push(token.to_string());
            }
        }

        LearnOutcome { lexicon, added }
    }
}

impl Default for FeedbackLearner {
    fn default() -> Self {
        Self::new(MIN_LEARNED_TOKEN_CHARS)
    }
}
