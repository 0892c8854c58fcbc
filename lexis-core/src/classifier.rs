//! Score-to-label thresholds.

use lexis_common::ScoringConfig;

use crate::types::SentimentLabel;

/// Maps a final score to a label. Thresholds are exclusive, so a score
/// sitting exactly on a threshold is neutral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classifier {
    positive_threshold: f64,
    negative_threshold: f64,
}

impl Classifier {
    pub fn new(positive_threshold: f64, negative_threshold: f64) -> Self {
        Self {
            positive_threshold,
            negative_threshold,
        }
    }

    pub fn from_policy(policy: &ScoringConfig) -> Self {
        Self::new(policy.positive_threshold, policy.negative_threshold)
    }

    pub fn classify(&self, score: f64) -> SentimentLabel {
        if score > self.positive_threshold {
            SentimentLabel::Positive
        } else if score < self.negative_threshold {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::from_policy(&ScoringConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(3.6, SentimentLabel::Positive)]
    #[test_case(0.51, SentimentLabel::Positive)]
    #[test_case(0.5, SentimentLabel::Neutral ; "upper threshold is neutral")]
    #[test_case(0.0, SentimentLabel::Neutral)]
    #[test_case(-0.5, SentimentLabel::Neutral ; "lower threshold is neutral")]
    #[test_case(-0.51, SentimentLabel::Negative)]
    #[test_case(-3.6, SentimentLabel::Negative)]
    fn default_thresholds(score: f64, expected: SentimentLabel) {
        assert_eq!(Classifier::default().classify(score), expected);
    }

    #[test]
    fn custom_thresholds() {
        let classifier = Classifier::new(1.0, -2.0);
        assert_eq!(classifier.classify(0.9), SentimentLabel::Neutral);
        assert_eq!(classifier.classify(-1.5), SentimentLabel::Neutral);
        assert_eq!(classifier.classify(-2.01), SentimentLabel::Negative);
    }
}
