use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConflictometroError {
    #[error("CSV error: {0}")]
    Csv(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Lexicon error: {0}")]
    Lexicon(String),

    #[error("Enrichment error: {0}")]
    Enrichment(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
