//! Persistence for the adaptive lexicon and analysis results.

mod memory;
mod sqlite;
mod traits;

pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{AdaptiveStore, AnalysisRecord, ResultStore};
