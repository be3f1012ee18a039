//! Embedding trainer boundary

use crate::config::{TrainingAlgorithm, TrainingConfig};
use crate::error::{JobSynonymsError, Result};
use crate::processing::vectors::WordVectors;
use log::{debug, info};
use serde::Serialize;
use std::path::Path;
use std::process::Command;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingParams {
    pub vector_size: usize,
    pub min_count: usize,
    pub window: usize,
    pub algorithm: TrainingAlgorithm,
    pub iterations: usize,
    pub threads: usize,
}

impl From<&TrainingConfig> for TrainingParams {
    fn from(config: &TrainingConfig) -> Self {
        Self {
            vector_size: config.vector_size,
            min_count: config.min_count,
            window: config.window,
            algorithm: config.algorithm,
            iterations: config.iterations,
            threads: config.threads,
        }
    }
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self::from(&TrainingConfig::default())
    }
}

pub trait EmbeddingTrainer {
    /// Train on a line corpus, persist vectors at `output` and return them
    fn train(&self, corpus: &Path, output: &Path, params: &TrainingParams) -> Result<WordVectors>;
}

/// Shells out to the reference `word2vec` command-line trainer
pub struct Word2VecCommand {
    command: String,
}

impl Word2VecCommand {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn args(&self, corpus: &Path, output: &Path, params: &TrainingParams) -> Vec<String> {
        let cbow = match params.algorithm {
            TrainingAlgorithm::SkipGram => "0",
            TrainingAlgorithm::Cbow => "1",
        };

        vec![
            "-train".to_string(),
            corpus.to_string_lossy().to_string(),
            "-output".to_string(),
            output.to_string_lossy().to_string(),
            "-size".to_string(),
            params.vector_size.to_string(),
            "-window".to_string(),
            params.window.to_string(),
            "-min-count".to_string(),
            params.min_count.to_string(),
            "-cbow".to_string(),
            cbow.to_string(),
            "-iter".to_string(),
            params.iterations.to_string(),
            "-threads".to_string(),
            params.threads.to_string(),
            "-binary".to_string(),
            "0".to_string(),
        ]
    }
}

impl EmbeddingTrainer for Word2VecCommand {
    fn train(&self, corpus: &Path, output: &Path, params: &TrainingParams) -> Result<WordVectors> {
        if !corpus.exists() {
            return Err(JobSynonymsError::Training(format!(
                "Corpus not found: {}",
                corpus.display()
            )));
        }
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let args = self.args(corpus, output, params);
        info!("Training embeddings with {} ({:?})", self.command, params.algorithm);
        debug!("{} {}", self.command, args.join(" "));

        let start_time = Instant::now();
        let result = Command::new(&self.command)
            .args(&args)
            .output()
            .map_err(|e| JobSynonymsError::Training(format!("Failed to start '{}': {}", self.command, e)))?;

        if !result.status.success() {
            return Err(JobSynonymsError::Training(format!(
                "'{}' exited with {}: {}",
                self.command,
                result.status,
                String::from_utf8_lossy(&result.stderr).trim()
            )));
        }
        info!("Training finished in {:.2?}", start_time.elapsed());

        WordVectors::load(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_params() {
        let params = TrainingParams::default();
        assert_eq!(params.vector_size, 100);
        assert_eq!(params.min_count, 5);
        assert_eq!(params.window, 10);
        assert_eq!(params.algorithm, TrainingAlgorithm::SkipGram);
    }

    #[test]
    fn test_args_select_algorithm() {
        let trainer = Word2VecCommand::new("word2vec");
        let mut params = TrainingParams::default();

        let args = trainer.args(Path::new("corpus.txt"), Path::new("out.vec"), &params);
        let cbow_at = args.iter().position(|a| a == "-cbow").unwrap();
        assert_eq!(args[cbow_at + 1], "0");
        assert_eq!(&args[..4], ["-train", "corpus.txt", "-output", "out.vec"]);
        assert_eq!(args.last().map(String::as_str), Some("0"));

        params.algorithm = TrainingAlgorithm::Cbow;
        let args = trainer.args(Path::new("corpus.txt"), Path::new("out.vec"), &params);
        assert_eq!(args[cbow_at + 1], "1");
    }

    #[test]
    fn test_missing_corpus() {
        let temp_dir = TempDir::new().unwrap();
        let trainer = Word2VecCommand::new("word2vec");
        let result = trainer.train(
            &temp_dir.path().join("missing.txt"),
            &temp_dir.path().join("out.vec"),
            &TrainingParams::default(),
        );
        assert!(matches!(result, Err(JobSynonymsError::Training(_))));
    }

    #[test]
    fn test_missing_executable() {
        let temp_dir = TempDir::new().unwrap();
        let corpus = temp_dir.path().join("corpus.txt");
        std::fs::write(&corpus, "a b c\n").unwrap();

        let trainer = Word2VecCommand::new("definitely-not-a-real-word2vec-binary");
        let result = trainer.train(&corpus, &temp_dir.path().join("out.vec"), &TrainingParams::default());
        assert!(matches!(result, Err(JobSynonymsError::Training(_))));
    }
}
