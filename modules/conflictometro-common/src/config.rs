use std::env;
use std::path::PathBuf;

/// Runtime configuration loaded from environment variables. CLI flags
/// override individual fields after loading.
#[derive(Debug, Clone)]
pub struct Config {
    /// Source batch files, in processing order.
    pub source_files: Vec<PathBuf>,
    /// Persisted dataset the merger appends into.
    pub dataset_path: PathBuf,
    /// Optional TOML lexicon overriding the built-in dictionaries.
    pub lexicon_path: Option<PathBuf>,
    /// Similarity threshold for fuzzy dedup, 0-100 scale.
    pub fuzzy_threshold: f64,
    /// Skip the fuzzy clustering stage (exact dedup always runs).
    pub skip_fuzzy: bool,
}

impl Config {
    /// Load configuration from environment variables, with defaults for
    /// everything; an empty source list is valid and yields an empty run.
    pub fn from_env() -> Self {
        Self {
            source_files: env::var("CONFLICTOMETRO_SOURCES")
                .map(|v| v.split(',').filter(|s| !s.is_empty()).map(PathBuf::from).collect())
                .unwrap_or_default(),
            dataset_path: env::var("CONFLICTOMETRO_DATASET")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/conflictos_clasificados.csv")),
            lexicon_path: env::var("CONFLICTOMETRO_LEXICON").ok().map(PathBuf::from),
            fuzzy_threshold: env::var("CONFLICTOMETRO_FUZZY_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(90.0),
            skip_fuzzy: false,
        }
    }
}
