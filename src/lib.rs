//! Job synonyms library: Japanese job-posting corpus building, word-embedding
//! synonym generation and search-index loading

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod processing;
pub mod search;
pub mod output;

pub use error::{Result, JobSynonymsError};
pub use config::Config;
