pub mod classify;
pub mod dedup;
pub mod enrich;
pub mod lexicon;
pub mod merge;
pub mod pipeline;
pub mod territory;

pub use classify::Classifier;
pub use dedup::{dedup_exact, dedup_fuzzy, title_similarity, DEFAULT_FUZZY_THRESHOLD};
pub use enrich::{EntityExtractor, LexiconExtractor, NoopExtractor};
pub use lexicon::{ConflictRule, Lexicon, SectorRule, TerritoryEntry};
pub use merge::merge_incremental;
pub use pipeline::{Pipeline, RunStats};
pub use territory::TerritoryResolver;
