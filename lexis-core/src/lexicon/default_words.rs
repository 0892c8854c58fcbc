//! Bundled English vocabulary.
//!
//! Weights are magnitudes; terms without an entry weigh 1.0.

pub(crate) const POSITIVE_TERMS: &[&str] = &[
    "good",
    "great",
    "excellent",
    "amazing",
    "awesome",
    "wonderful",
    "fantastic",
    "outstanding",
    "perfect",
    "love",
    "loved",
    "like",
    "nice",
    "helpful",
    "useful",
    "beautiful",
    "brilliant",
    "happy",
    "pleased",
    "glad",
    "thanks",
    "thank",
    "recommend",
    "best",
    "superb",
    "impressive",
    "enjoyed",
    "favorite",
    "reliable",
    "fast",
    "easy",
    "well done",
    "highly recommended",
];

pub(crate) const NEGATIVE_TERMS: &[&str] = &[
    "bad",
    "terrible",
    "awful",
    "horrible",
    "worst",
    "poor",
    "hate",
    "hated",
    "dislike",
    "useless",
    "broken",
    "disappointed",
    "disappointing",
    "annoying",
    "ugly",
    "slow",
    "wrong",
    "problem",
    "bug",
    "fail",
    "failed",
    "scam",
    "spam",
    "boring",
    "waste",
    "angry",
    "sad",
    "unhappy",
    "never again",
    "not working",
];

pub(crate) const NEUTRAL_TERMS: &[&str] = &[
    "okay",
    "average",
    "normal",
    "ordinary",
    "standard",
    "typical",
    "moderate",
    "usual",
    "regular",
    "mediocre",
];

pub(crate) const WEIGHTS: &[(&str, f64)] = &[
    ("excellent", 2.0),
    ("amazing", 2.0),
    ("outstanding", 2.0),
    ("perfect", 2.0),
    ("love", 1.5),
    ("loved", 1.5),
    ("best", 1.5),
    ("highly recommended", 2.0),
    ("like", 0.5),
    ("nice", 0.8),
    ("thanks", 0.5),
    ("thank", 0.5),
    ("terrible", 2.0),
    ("awful", 2.0),
    ("horrible", 2.0),
    ("worst", 2.0),
    ("scam", 2.0),
    ("hate", 1.5),
    ("hated", 1.5),
    ("never again", 1.5),
    ("slow", 0.7),
    ("problem", 0.7),
    ("bug", 0.7),
];
