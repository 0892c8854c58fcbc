//! Core value types shared by the analysis and learning paths.

use lexis_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sentiment label assigned to a text.
///
/// Lexicon categories use the same three variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// All labels, in lexicon iteration order.
    pub const ALL: [SentimentLabel; 3] = [Self::Positive, Self::Negative, Self::Neutral];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }

    /// Sign applied to a term weight when accumulating the raw score.
    pub const fn polarity(&self) -> f64 {
        match self {
            Self::Positive => 1.0,
            Self::Negative => -1.0,
            Self::Neutral => 0.0,
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(Self::Positive),
            "negative" => Ok(Self::Negative),
            "neutral" => Ok(Self::Neutral),
            other => Err(Error::InvalidInput(format!(
                "unknown sentiment label '{other}', expected positive, negative or neutral"
            ))),
        }
    }
}

/// Distinct matched terms per lexicon category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordStats {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl WordStats {
    pub fn get(&self, category: SentimentLabel) -> usize {
        match category {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Negative => self.negative,
            SentimentLabel::Neutral => self.neutral,
        }
    }

    pub fn increment(&mut self, category: SentimentLabel) {
        match category {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Negative => self.negative += 1,
            SentimentLabel::Neutral => self.neutral += 1,
        }
    }

    /// Matched positive plus negative terms.
    pub fn polar_total(&self) -> usize {
        self.positive + self.negative
    }
}

/// Result of one analysis pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub label: SentimentLabel,
    /// Final score, rounded to 2 decimal places
    pub score: f64,
    /// Weighted sum of matched terms before length adjustment
    pub raw_score: f64,
    pub word_stats: WordStats,
    pub word_count: usize,
    pub interrogative: bool,
}

/// A moderator's correction of a stored analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEvent {
    pub identifier: String,
    pub original_text: String,
    pub corrected_label: SentimentLabel,
}

impl FeedbackEvent {
    pub fn new(
        identifier: impl Into<String>,
        original_text: impl Into<String>,
        corrected_label: SentimentLabel,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            original_text: original_text.into(),
            corrected_label,
        }
    }

    /// Build an event from untrusted input, rejecting unknown labels.
    pub fn parse(identifier: &str, original_text: &str, corrected_label: &str) -> Result<Self> {
        if identifier.trim().is_empty() {
            return Err(Error::InvalidInput("identifier must not be empty".into()));
        }
        let label = corrected_label.parse()?;
        Ok(Self::new(identifier, original_text, label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_parses_case_insensitively() {
        assert_eq!("Positive".parse::<SentimentLabel>().unwrap(), SentimentLabel::Positive);
        assert_eq!(" NEGATIVE ".parse::<SentimentLabel>().unwrap(), SentimentLabel::Negative);
        assert_eq!("neutral".parse::<SentimentLabel>().unwrap(), SentimentLabel::Neutral);
    }

    #[test]
    fn unknown_label_is_invalid_input() {
        let err = "spam".parse::<SentimentLabel>().unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn label_serialization() {
        assert_eq!(serde_json::to_string(&SentimentLabel::Negative).unwrap(), "\"negative\"");
        let label: SentimentLabel = serde_json::from_str("\"positive\"").unwrap();
        assert_eq!(label, SentimentLabel::Positive);
        assert!(serde_json::from_str::<SentimentLabel>("\"mixed\"").is_err());
    }

    #[test]
    fn word_stats_counts_per_category() {
        let mut stats = WordStats::default();
        stats.increment(SentimentLabel::Positive);
        stats.increment(SentimentLabel::Positive);
        stats.increment(SentimentLabel::Neutral);
        assert_eq!(stats.get(SentimentLabel::Positive), 2);
        assert_eq!(stats.get(SentimentLabel::Negative), 0);
        assert_eq!(stats.polar_total(), 2);
    }

    #[test]
    fn feedback_parse_rejects_bad_input() {
        assert!(FeedbackEvent::parse("c-1", "text", "great").is_err());
        assert!(FeedbackEvent::parse("  ", "text", "positive").is_err());

        let event = FeedbackEvent::parse("c-1", "text", "negative").unwrap();
        assert_eq!(event.corrected_label, SentimentLabel::Negative);
    }
}
