//! Error handling for the job synonyms pipeline

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobSynonymsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Tagger error: {0}")]
    Tagger(String),

    #[error("Malformed tagger record: {0:?}")]
    MalformedRecord(String),

    #[error("Training error: {0}")]
    Training(String),

    #[error("Word vectors error: {0}")]
    Vectors(String),

    #[error("Word not in vocabulary: {0}")]
    UnknownWord(String),

    #[error("Search index error (status {status}): {message}")]
    IndexApi { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, JobSynonymsError>;

