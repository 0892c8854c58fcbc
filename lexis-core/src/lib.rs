//! Lexis Core - lexicon-based sentiment scoring with an adaptive vocabulary.
//!
//! ## Architecture
//!
//! ```text
//! text → normalize → match (snapshot) → length adjust → damp → classify
//!                           ▲
//! feedback → learn ─ save(expected_version) ─→ publish new snapshot
//! ```
//!
//! Built-in terms are fixed for the life of the process. Terms learned from
//! moderator corrections live in an [`AdaptiveStore`] and are merged with the
//! built-in terms into immutable [`LexiconSnapshot`]s.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod analyzer;
pub mod classifier;
pub mod engine;
pub mod learner;
pub mod lexicon;
pub mod matcher;
pub mod normalizer;
pub mod scoring;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use analyzer::Analyzer;
pub use classifier::Classifier;
pub use engine::{EngineSettings, FeedbackOutcome, SentimentEngine, MAX_SAVE_ATTEMPTS};
pub use learner::{FeedbackLearner, LearnOutcome};
pub use lexicon::{AdaptiveLexicon, BuiltinLexicon, LexiconDefinition, LexiconSnapshot, VersionedLexicon};
pub use matcher::{match_terms, MatchResult};
pub use normalizer::{normalize, NormalizedText};
pub use scoring::{ScoreCalculator, ScoreInput};
pub use store::{AdaptiveStore, AnalysisRecord, InMemoryStore, ResultStore, SqliteStore};
pub use types::{Analysis, FeedbackEvent, SentimentLabel, WordStats};
