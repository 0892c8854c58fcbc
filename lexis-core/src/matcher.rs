//! Whole-word lexicon matching.

use std::collections::HashSet;

use crate::lexicon::LexiconSnapshot;
use crate::normalizer::NormalizedText;
use crate::types::{SentimentLabel, WordStats};

/// Matches found in one text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchResult {
    /// Distinct matched terms per category
    pub word_stats: WordStats,
    /// Sum of signed weights of the matched terms
    pub raw_score: f64,
    pub matched: Vec<(SentimentLabel, String)>,
}

/// Find every lexicon term occurring as whole words in `text`.
///
/// Each term counts once however often it occurs. Phrases match only a
/// contiguous run of whole tokens, so "well done" does not match
/// "farewell donegal".
pub fn match_terms(text: &NormalizedText, lexicon: &LexiconSnapshot) -> MatchResult {
    let mut result = MatchResult::default();
    if text.is_blank() {
        return result;
    }

    let tokens: HashSet<&str> = text.tokens().collect();
    let padded = format!(" {} ", text.tokens().collect::<Vec<_>>().join(" "));

    for (category, terms) in lexicon.categories() {
        for term in terms {
            let found = if term.contains(' ') {
                padded.contains(&format!(" {term} "))
            } else {
                tokens.contains(term.as_str())
            };
            if !found {
                continue;
            }

            result.word_stats.increment(category);
            result.raw_score += category.polarity() * lexicon.weight_of(term);
            result.matched.push((category, term.clone()));
        }
    }

    tracing::trace!(
        matched = result.matched.len(),
        raw_score = result.raw_score,
        "Lexicon matching complete"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::{BuiltinLexicon, LexiconDefinition, VersionedLexicon};
    use crate::normalizer::normalize;
    use std::collections::HashMap;

    fn snapshot() -> LexiconSnapshot {
        let definition = LexiconDefinition {
            positive: vec!["good".into(), "excellent".into(), "well done".into()],
            negative: vec!["bad".into(), "terrible".into()],
            neutral: vec!["okay".into()],
            weights: HashMap::from([("excellent".into(), 2.0), ("terrible".into(), 2.0)]),
        };
        BuiltinLexicon::new(definition)
            .unwrap()
            .merge(&VersionedLexicon::default())
    }

    #[test]
    fn whole_words_only() {
        let result = match_terms(&normalize("goodness, badminton"), &snapshot());
        assert_eq!(result.word_stats, WordStats::default());
        assert_eq!(result.raw_score, 0.0);
    }

    #[test]
    fn distinct_terms_counted_once() {
        let result = match_terms(&normalize("good good GOOD bad"), &snapshot());
        assert_eq!(result.word_stats.positive, 1);
        assert_eq!(result.word_stats.negative, 1);
        assert!((result.raw_score - 0.0).abs() < 1e-9);
    }

    #[test]
    fn weights_and_polarity() {
        let result = match_terms(&normalize("Excellent service, terrible food, okay price"), &snapshot());
        assert_eq!(
            result.word_stats,
            WordStats {
                positive: 1,
                negative: 1,
                neutral: 1
            }
        );
        assert!((result.raw_score - 0.0).abs() < 1e-9);

        let result = match_terms(&normalize("excellent and good"), &snapshot());
        assert!((result.raw_score - 3.0).abs() < 1e-9);
    }

    #[test]
    fn phrases_need_contiguous_tokens() {
        let lexicon = snapshot();
        let hit = match_terms(&normalize("Well   done, team"), &lexicon);
        assert!(hit.matched.contains(&(SentimentLabel::Positive, "well done".into())));

        let miss = match_terms(&normalize("farewell donegal"), &lexicon);
        assert!(miss.matched.is_empty());

        let split = match_terms(&normalize("well, it is done"), &lexicon);
        assert!(split.matched.is_empty());
    }

    #[test]
    fn empty_text_matches_nothing() {
        let result = match_terms(&normalize(""), &snapshot());
        assert_eq!(result, MatchResult::default());
    }
}
