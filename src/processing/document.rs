//! Job postings and the training documents derived from them

use serde::{Deserialize, Serialize};

/// The three free-text fields the pipeline reads from a posting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub job_title: String,
    pub requirements: String,
    pub summary: String,
}

impl JobPosting {
    pub fn new(
        job_title: impl Into<String>,
        requirements: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            job_title: job_title.into(),
            requirements: requirements.into(),
            summary: summary.into(),
        }
    }
}

pub type TokenList = Vec<String>;

/// Two token lists per posting: title plus requirement nouns, then summary nouns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingDocument {
    pub title_and_requirements: TokenList,
    pub summary: TokenList,
}

impl TrainingDocument {
    pub fn token_count(&self) -> usize {
        self.title_and_requirements.len() + self.summary.len()
    }

    /// Trainer sentences in emission order
    pub fn into_sentences(self) -> [TokenList; 2] {
        [self.title_and_requirements, self.summary]
    }
}
