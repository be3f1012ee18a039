//! Configuration management for the job synonyms pipeline

use crate::error::{JobSynonymsError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
    pub tagger: TaggerConfig,
    pub training: TrainingConfig,
    pub synonyms: SynonymConfig,
    pub index: IndexConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub postings_path: PathBuf,
    pub corpus_path: PathBuf,
    pub vectors_path: PathBuf,
    pub synonym_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggerConfig {
    /// MeCab-compatible executable
    pub command: String,
    pub dictionary_dir: Option<PathBuf>,
    pub noun_tag: String,
    pub unknown_tag: String,
    pub eos_marker: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrainingAlgorithm {
    SkipGram,
    Cbow,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub command: String,
    pub vector_size: usize,
    pub min_count: usize,
    pub window: usize,
    pub algorithm: TrainingAlgorithm,
    pub iterations: usize,
    pub threads: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynonymConfig {
    pub top_n: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub url: String,
    pub batch_size: usize,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub color_output: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            postings_path: PathBuf::from("data/job_postings.csv"),
            corpus_path: PathBuf::from("data/corpus.txt"),
            vectors_path: PathBuf::from("job_word_embeddings.vec"),
            synonym_path: PathBuf::from("data/synonym.txt"),
        }
    }
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            command: "mecab".to_string(),
            dictionary_dir: None,
            noun_tag: "名詞".to_string(),
            unknown_tag: "未知語".to_string(),
            eos_marker: "EOS".to_string(),
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            command: "word2vec".to_string(),
            vector_size: 100,
            min_count: 5,
            window: 10,
            algorithm: TrainingAlgorithm::SkipGram,
            iterations: 5,
            threads: 4,
        }
    }
}

impl Default for SynonymConfig {
    fn default() -> Self {
        Self { top_n: 5 }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9200".to_string(),
            batch_size: 500,
            timeout_secs: 30,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { color_output: true }
    }
}

impl std::str::FromStr for TrainingAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "skip-gram" | "skipgram" | "sg" => Ok(TrainingAlgorithm::SkipGram),
            "cbow" => Ok(TrainingAlgorithm::Cbow),
            _ => Err(format!("Invalid training algorithm: {}. Supported: skip-gram, cbow", s)),
        }
    }
}

impl Config {
    /// Load from an explicit path, or from the default location (writing defaults there on first run)
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let config_path = Self::config_path();
                if config_path.exists() {
                    Self::load_from(&config_path)
                } else {
                    let config = Self::default();
                    config.save_to(&config_path)?;
                    Ok(config)
                }
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            JobSynonymsError::Configuration(format!("Failed to parse config {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| JobSynonymsError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("job-synonyms")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        if self.training.vector_size == 0 {
            return Err(JobSynonymsError::Configuration(
                "training.vector_size must be greater than zero".to_string(),
            ));
        }
        if self.training.window == 0 {
            return Err(JobSynonymsError::Configuration(
                "training.window must be greater than zero".to_string(),
            ));
        }
        if self.index.batch_size == 0 {
            return Err(JobSynonymsError::Configuration(
                "index.batch_size must be greater than zero".to_string(),
            ));
        }
        if self.tagger.noun_tag.is_empty() || self.tagger.eos_marker.is_empty() {
            return Err(JobSynonymsError::Configuration(
                "tagger.noun_tag and tagger.eos_marker must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_round_trips_through_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        Config::default().save_to(&path).unwrap();
        let loaded = Config::load(Some(&path)).unwrap();

        assert_eq!(loaded.training.vector_size, 100);
        assert_eq!(loaded.training.min_count, 5);
        assert_eq!(loaded.training.window, 10);
        assert_eq!(loaded.training.algorithm, TrainingAlgorithm::SkipGram);
        assert_eq!(loaded.tagger.noun_tag, "名詞");
        assert_eq!(loaded.synonyms.top_n, 5);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[training]\nwindow = 3\nalgorithm = \"cbow\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.training.window, 3);
        assert_eq!(config.training.algorithm, TrainingAlgorithm::Cbow);
        assert_eq!(config.training.vector_size, 100);
        assert_eq!(config.index.url, "http://localhost:9200");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[index]\nbatch_size = 0\n").unwrap();

        let result = Config::load_from(&path);
        assert!(matches!(result, Err(JobSynonymsError::Configuration(_))));
    }

    #[test]
    fn test_algorithm_parsing() {
        assert_eq!("sg".parse::<TrainingAlgorithm>().unwrap(), TrainingAlgorithm::SkipGram);
        assert_eq!("CBOW".parse::<TrainingAlgorithm>().unwrap(), TrainingAlgorithm::Cbow);
        assert!("glove".parse::<TrainingAlgorithm>().is_err());
    }
}
