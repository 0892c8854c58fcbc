//! One analysis pass: normalize, match, score, classify.

use lexis_common::ScoringConfig;

use crate::classifier::Classifier;
use crate::lexicon::LexiconSnapshot;
use crate::matcher::match_terms;
use crate::normalizer::{normalize, strip_markup};
use crate::scoring::{ScoreCalculator, ScoreInput};
use crate::types::Analysis;

/// Stateless analysis pipeline for a fixed scoring policy.
#[derive(Debug, Clone)]
pub struct Analyzer {
    calculator: ScoreCalculator,
    classifier: Classifier,
}

impl Analyzer {
    pub fn new(policy: ScoringConfig) -> Self {
        let classifier = Classifier::from_policy(&policy);
        Self {
            calculator: ScoreCalculator::new(policy),
            classifier,
        }
    }

    pub fn policy(&self) -> &ScoringConfig {
        self.calculator.policy()
    }

    /// Analyze `raw` against `snapshot`. Total: blank input is neutral.
    pub fn analyze(&self, snapshot: &LexiconSnapshot, raw: &str) -> Analysis {
        let visible = strip_markup(raw);
        let normalized = normalize(raw);
        let matches = match_terms(&normalized, snapshot);
        let word_count = normalized.word_count();
        let interrogative = self.calculator.is_interrogative(&visible, &normalized);

        let score = self.calculator.score(&ScoreInput {
            raw_score: matches.raw_score,
            word_stats: matches.word_stats,
            word_count,
            interrogative,
        });
        let label = self.classifier.classify(score);

        tracing::debug!(
            label = %label,
            score,
            raw_score = matches.raw_score,
            word_count,
            interrogative,
            adaptive_version = snapshot.adaptive_version(),
            "Text analyzed"
        );

        Analysis {
            label,
            score,
            raw_score: matches.raw_score,
            word_stats: matches.word_stats,
            word_count,
            interrogative,
        }
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::{BuiltinLexicon, LexiconDefinition, VersionedLexicon};
    use crate::types::SentimentLabel;
    use std::collections::HashMap;

    fn snapshot() -> LexiconSnapshot {
        let definition = LexiconDefinition {
            positive: vec!["good".into(), "great".into(), "fast".into()],
            negative: vec!["bad".into(), "broken".into()],
            neutral: vec!["okay".into()],
            weights: HashMap::from([("broken".into(), 2.0)]),
        };
        BuiltinLexicon::new(definition)
            .unwrap()
            .merge(&VersionedLexicon::default())
    }

    #[test]
    fn single_positive_word() {
        let analysis = Analyzer::default().analyze(&snapshot(), "Good");
        assert_eq!(analysis.label, SentimentLabel::Positive);
        assert_eq!(analysis.score, 1.8);
        assert_eq!(analysis.raw_score, 1.0);
        assert_eq!(analysis.word_count, 1);
        assert!(!analysis.interrogative);
    }

    #[test]
    fn weighted_negative_word() {
        let analysis = Analyzer::default().analyze(&snapshot(), "broken");
        assert_eq!(analysis.label, SentimentLabel::Negative);
        assert_eq!(analysis.score, -3.6);
    }

    #[test]
    fn blank_text_is_neutral() {
        let analysis = Analyzer::default().analyze(&snapshot(), "  <br/> ");
        assert_eq!(analysis.label, SentimentLabel::Neutral);
        assert_eq!(analysis.score, 0.0);
        assert_eq!(analysis.word_count, 0);
    }

    #[test]
    fn question_is_damped() {
        let analyzer = Analyzer::default();
        let lexicon = snapshot();
        let plain = analyzer.analyze(&lexicon, "good and fast");
        let question = analyzer.analyze(&lexicon, "good and fast?");
        assert!(question.interrogative);
        assert_eq!(plain.score, 3.6);
        assert_eq!(question.score, 2.52);
    }

    #[test]
    fn question_mark_inside_markup_is_ignored() {
        let analyzer = Analyzer::default();
        let lexicon = snapshot();
        let linked = analyzer.analyze(&lexicon, r#"<a href="/p?id=1">good</a>"#);
        assert!(!linked.interrogative);
        assert_eq!(linked.score, 1.8);

        let asked = analyzer.analyze(&lexicon, r#"<a href="/p">good</a>?"#);
        assert!(asked.interrogative);
        assert_eq!(asked.score, 1.26);
    }

    #[test]
    fn neutral_terms_only_count() {
        let analysis = Analyzer::default().analyze(&snapshot(), "it was okay");
        assert_eq!(analysis.word_stats.neutral, 1);
        assert_eq!(analysis.label, SentimentLabel::Neutral);
    }
}
