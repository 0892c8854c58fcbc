//! Length-dependent score adjustment and interrogative damping.
//!
//! Short texts amplify the raw score, mid-length texts are normalized by
//! `sqrt(word_count)`, and long texts are scored by the balance of matched
//! positive against negative terms, ignoring weights. The bucket boundaries
//! and factors come from [`ScoringConfig`].

use lexis_common::ScoringConfig;

use crate::normalizer::{normalize_term, NormalizedText};
use crate::types::WordStats;

/// Question marks recognised in markup-stripped text.
const QUESTION_MARKS: &[char] = &['?', '؟', '？'];

/// Inputs to the score calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreInput {
    pub raw_score: f64,
    pub word_stats: WordStats,
    pub word_count: usize,
    pub interrogative: bool,
}

/// Applies the scoring policy to match results.
#[derive(Debug, Clone)]
pub struct ScoreCalculator {
    policy: ScoringConfig,
    // Interrogative keywords in token form.
    keywords: Vec<String>,
}

impl ScoreCalculator {
    pub fn new(policy: ScoringConfig) -> Self {
        let mut keywords: Vec<String> = policy
            .interrogative_keywords
            .iter()
            .map(|keyword| normalize_term(keyword))
            .filter(|keyword| !keyword.is_empty())
            .collect();
        keywords.sort();
        keywords.dedup();
        Self { policy, keywords }
    }

    pub fn policy(&self) -> &ScoringConfig {
        &self.policy
    }

    /// Score adjusted for text length, before damping and rounding.
    pub fn length_adjusted(&self, raw_score: f64, word_stats: &WordStats, word_count: usize) -> f64 {
        let p = &self.policy;
        match word_count {
            0 => raw_score,
            n if n <= p.short_text_max_words => raw_score * p.short_text_multiplier,
            n if n <= p.medium_text_max_words => raw_score * p.medium_text_multiplier,
            n if n > p.long_text_min_words => {
                let polar = word_stats.polar_total();
                if polar == 0 {
                    return 0.0;
                }
                let balance = (word_stats.positive as f64 - word_stats.negative as f64) / polar as f64;
                balance * (n as f64).sqrt()
            }
            n => raw_score / (n as f64).sqrt(),
        }
    }

    /// Final score: length adjustment, interrogative damping, rounding to
    /// two decimal places.
    pub fn score(&self, input: &ScoreInput) -> f64 {
        let mut score = self.length_adjusted(input.raw_score, &input.word_stats, input.word_count);
        if input.interrogative {
            score *= self.policy.interrogative_penalty;
        }
        round2(score)
    }

    /// Whether a text reads as a question.
    ///
    /// `visible` is the markup-stripped text from
    /// [`strip_markup`](crate::normalizer::strip_markup); question marks inside
    /// tags are not seen. Keywords are matched against normalized tokens.
    pub fn is_interrogative(&self, visible: &str, normalized: &NormalizedText) -> bool {
        if visible.contains(QUESTION_MARKS) {
            return true;
        }
        normalized.tokens().any(|token| self.keywords.iter().any(|k| k == token))
    }
}

impl Default for ScoreCalculator {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

/// Round half away from zero to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
