//! Categorized vocabulary and weights.
//!
//! A [`BuiltinLexicon`] is fixed for the life of the process. Merging it with
//! an [`AdaptiveLexicon`] yields an immutable [`LexiconSnapshot`], which is
//! what analyses run against. Categories are mutually exclusive in every
//! snapshot: construction rejects duplicated built-in terms, and merging
//! drops adaptive terms that would break exclusivity.

mod adaptive;
mod default_words;

pub use adaptive::{AdaptiveLexicon, VersionedLexicon};

use lexis_common::{Error, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::Arc;

use crate::normalizer::normalize_term;
use crate::types::SentimentLabel;

/// Weight of a term with no entry in the weight table.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Serialized lexicon definition, as read from a JSON file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LexiconDefinition {
    #[serde(default)]
    pub positive: Vec<String>,
    #[serde(default)]
    pub negative: Vec<String>,
    #[serde(default)]
    pub neutral: Vec<String>,
    #[serde(default)]
    pub weights: HashMap<String, f64>,
}

impl LexiconDefinition {
    /// The bundled English vocabulary.
    pub fn bundled() -> Self {
        let owned = |terms: &[&str]| terms.iter().map(|t| (*t).to_string()).collect();
        Self {
            positive: owned(default_words::POSITIVE_TERMS),
            negative: owned(default_words::NEGATIVE_TERMS),
            neutral: owned(default_words::NEUTRAL_TERMS),
            weights: default_words::WEIGHTS
                .iter()
                .map(|(term, weight)| ((*term).to_string(), *weight))
                .collect(),
        }
    }

    fn terms(&self, category: SentimentLabel) -> &[String] {
        match category {
            SentimentLabel::Positive => &self.positive,
            SentimentLabel::Negative => &self.negative,
            SentimentLabel::Neutral => &self.neutral,
        }
    }
}

/// Term sets indexed by category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct CategorySets {
    positive: BTreeSet<String>,
    negative: BTreeSet<String>,
    neutral: BTreeSet<String>,
}

impl CategorySets {
    fn get(&self, category: SentimentLabel) -> &BTreeSet<String> {
        match category {
            SentimentLabel::Positive => &self.positive,
            SentimentLabel::Negative => &self.negative,
            SentimentLabel::Neutral => &self.neutral,
        }
    }

    fn get_mut(&mut self, category: SentimentLabel) -> &mut BTreeSet<String> {
        match category {
            SentimentLabel::Positive => &mut self.positive,
            SentimentLabel::Negative => &mut self.negative,
            SentimentLabel::Neutral => &mut self.neutral,
        }
    }

    fn category_of(&self, term: &str) -> Option<SentimentLabel> {
        SentimentLabel::ALL
            .into_iter()
            .find(|category| self.get(*category).contains(term))
    }
}

/// The built-in lexicon: three exclusive term sets plus a weight table.
#[derive(Debug, Clone)]
pub struct BuiltinLexicon {
    sets: CategorySets,
    weights: Arc<HashMap<String, f64>>,
}

impl BuiltinLexicon {
    /// Build from a definition, normalizing every term.
    ///
    /// Fails when a term appears in more than one category or a weight is
    /// not a positive finite number.
    pub fn new(definition: LexiconDefinition) -> Result<Self> {
        let mut sets = CategorySets::default();
        let mut duplicates = BTreeSet::new();

        for category in SentimentLabel::ALL {
            for raw in definition.terms(category) {
                let term = normalize_term(raw);
                if term.is_empty() {
                    tracing::warn!(term = %raw, category = %category, "Skipping term that normalizes to nothing");
                    continue;
                }
                match sets.category_of(&term) {
                    Some(existing) if existing != category => {
                        duplicates.insert(format!("'{term}' ({existing}/{category})"));
                    }
                    _ => {
                        sets.get_mut(category).insert(term);
                    }
                }
            }
        }

        if !duplicates.is_empty() {
            return Err(Error::Config(format!(
                "lexicon terms appear in more than one category: {}",
                duplicates.into_iter().collect::<Vec<_>>().join(", ")
            )));
        }

        let mut weights = HashMap::with_capacity(definition.weights.len());
        for (raw, weight) in definition.weights {
            if !weight.is_finite() || weight <= 0.0 {
                return Err(Error::Config(format!(
                    "weight for '{raw}' must be a positive finite number, got {weight}"
                )));
            }
            let term = normalize_term(&raw);
            if sets.category_of(&term).is_none() {
                tracing::debug!(term = %term, "Weight given for a term outside the lexicon");
            }
            weights.insert(term, weight);
        }

        Ok(Self {
            sets,
            weights: Arc::new(weights),
        })
    }

    /// The bundled English lexicon.
    pub fn bundled() -> Result<Self> {
        Self::new(LexiconDefinition::bundled())
    }

    /// Load a lexicon definition from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("reading lexicon definition {}", path.display()))?;
        let definition: LexiconDefinition = serde_json::from_str(&content)
            .context(format!("parsing lexicon definition {}", path.display()))?;
        Self::new(definition)
    }

    pub fn terms(&self, category: SentimentLabel) -> &BTreeSet<String> {
        self.sets.get(category)
    }

    pub fn weight_of(&self, term: &str) -> f64 {
        self.weights.get(term).copied().unwrap_or(DEFAULT_WEIGHT)
    }

    /// Merge learned terms into a new snapshot.
    ///
    /// Adaptive terms that already have a built-in category are ignored, and
    /// a term learned under both polarities is dropped from both.
    pub fn merge(&self, adaptive: &VersionedLexicon) -> LexiconSnapshot {
        let mut sets = self.sets.clone();
        let learned = &adaptive.lexicon;

        for category in [SentimentLabel::Positive, SentimentLabel::Negative] {
            let Some(terms) = learned.terms(category) else {
                continue;
            };
            for term in terms {
                if let Some(existing) = self.sets.category_of(term) {
                    if existing != category {
                        tracing::warn!(
                            term = %term,
                            learned = %category,
                            builtin = %existing,
                            "Ignoring learned term that conflicts with the built-in lexicon"
                        );
                    }
                    continue;
                }
                if learned.positive.contains(term) && learned.negative.contains(term) {
                    if category == SentimentLabel::Positive {
                        tracing::warn!(term = %term, "Ignoring term learned as both positive and negative");
                    }
                    continue;
                }
                sets.get_mut(category).insert(term.clone());
            }
        }

        LexiconSnapshot {
            sets,
            weights: Arc::clone(&self.weights),
            adaptive_version: adaptive.version,
        }
    }
}

/// Immutable merged view of built-in and learned terms.
#[derive(Debug, Clone)]
pub struct LexiconSnapshot {
    sets: CategorySets,
    weights: Arc<HashMap<String, f64>>,
    adaptive_version: u64,
}

impl LexiconSnapshot {
    /// Merged terms per category.
    pub fn categories(&self) -> impl Iterator<Item = (SentimentLabel, &BTreeSet<String>)> {
        SentimentLabel::ALL
            .into_iter()
            .map(move |category| (category, self.sets.get(category)))
    }

    pub fn terms(&self, category: SentimentLabel) -> &BTreeSet<String> {
        self.sets.get(category)
    }

    pub fn weight_of(&self, term: &str) -> f64 {
        self.weights.get(term).copied().unwrap_or(DEFAULT_WEIGHT)
    }

    /// Whether the term belongs to any category.
    pub fn contains(&self, term: &str) -> bool {
        self.sets.category_of(term).is_some()
    }

    pub fn category_of(&self, term: &str) -> Option<SentimentLabel> {
        self.sets.category_of(term)
    }

    /// Version of the adaptive lexicon merged into this snapshot.
    pub fn adaptive_version(&self) -> u64 {
        self.adaptive_version
    }

    pub fn len(&self) -> usize {
        SentimentLabel::ALL
            .into_iter()
            .map(|category| self.sets.get(category).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(positive: &[&str], negative: &[&str], neutral: &[&str]) -> LexiconDefinition {
        let owned = |terms: &[&str]| terms.iter().map(|t| t.to_string()).collect();
        LexiconDefinition {
            positive: owned(positive),
            negative: owned(negative),
            neutral: owned(neutral),
            weights: HashMap::new(),
        }
    }

    #[test]
    fn bundled_lexicon_is_consistent() {
        let lexicon = BuiltinLexicon::bundled().unwrap();
        assert!(lexicon.terms(SentimentLabel::Positive).contains("excellent"));
        assert!(lexicon.terms(SentimentLabel::Negative).contains("never again"));
        assert!((lexicon.weight_of("excellent") - 2.0).abs() < f64::EPSILON);
        assert!((lexicon.weight_of("good") - DEFAULT_WEIGHT).abs() < f64::EPSILON);
    }

    #[test]
    fn cross_category_duplicate_fails_fast() {
        let err = BuiltinLexicon::new(definition(&["sick"], &["Sick"], &[])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("sick"));
    }

    #[test]
    fn same_category_duplicate_collapses() {
        let lexicon = BuiltinLexicon::new(definition(&["good", "GOOD", " good "], &[], &[])).unwrap();
        assert_eq!(lexicon.terms(SentimentLabel::Positive).len(), 1);
    }

    #[test]
    fn non_positive_weight_rejected() {
        let mut def = definition(&["good"], &["bad"], &[]);
        def.weights.insert("bad".into(), -2.0);
        assert!(BuiltinLexicon::new(def).is_err());
    }

    #[test]
    fn weights_are_normalized() {
        let mut def = definition(&["Well Done"], &[], &[]);
        def.weights.insert("WELL  done".into(), 3.0);
        let lexicon = BuiltinLexicon::new(def).unwrap();
        assert!((lexicon.weight_of("well done") - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn merge_unions_learned_terms() {
        let builtin = BuiltinLexicon::new(definition(&["good"], &["bad"], &["okay"])).unwrap();
        let mut learned = AdaptiveLexicon::default();
        learned.insert(SentimentLabel::Positive, "stellar");
        learned.insert(SentimentLabel::Positive, "good");
        learned.insert(SentimentLabel::Negative, "laggy");

        let snapshot = builtin.merge(&VersionedLexicon { version: 7, lexicon: learned });
        assert_eq!(snapshot.terms(SentimentLabel::Positive).len(), 2);
        assert_eq!(snapshot.category_of("laggy"), Some(SentimentLabel::Negative));
        assert_eq!(snapshot.adaptive_version(), 7);
        assert_eq!(snapshot.len(), 5);
        // Built-in sets are untouched.
        assert_eq!(builtin.terms(SentimentLabel::Positive).len(), 1);
    }

    #[test]
    fn merge_keeps_categories_exclusive() {
        let builtin = BuiltinLexicon::new(definition(&["good"], &["bad"], &["okay"])).unwrap();
        let mut learned = AdaptiveLexicon::default();
        learned.insert(SentimentLabel::Positive, "okay");
        learned.insert(SentimentLabel::Negative, "good");
        learned.insert(SentimentLabel::Positive, "meh");
        learned.insert(SentimentLabel::Negative, "meh");

        let snapshot = builtin.merge(&VersionedLexicon { version: 1, lexicon: learned });
        assert_eq!(snapshot.category_of("okay"), Some(SentimentLabel::Neutral));
        assert_eq!(snapshot.category_of("good"), Some(SentimentLabel::Positive));
        assert!(!snapshot.contains("meh"));
    }

    #[test]
    fn definition_loads_from_json() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("lexicon.json");
        std::fs::write(
            &path,
            r#"{"positive":["خوب"],"negative":["بد"],"weights":{"بد":2.0}}"#,
        )
        .unwrap();

        let lexicon = BuiltinLexicon::from_json_file(&path).unwrap();
        assert!(lexicon.terms(SentimentLabel::Positive).contains("خوب"));
        assert!((lexicon.weight_of("بد") - 2.0).abs() < f64::EPSILON);
        assert!(lexicon.terms(SentimentLabel::Neutral).is_empty());
    }

    #[test]
    fn missing_definition_file_is_an_error() {
        let err = BuiltinLexicon::from_json_file(Path::new("/nonexistent/lexicon.json")).unwrap_err();
        assert!(matches!(err, Error::WithContext { .. }));
    }
}
