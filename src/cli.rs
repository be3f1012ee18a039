//! CLI interface for the job synonyms pipeline

use crate::config::TrainingAlgorithm;
use crate::output::formatter::ReportFormat;
use crate::processing::corpus::CorpusFormat;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "job-synonyms")]
#[command(about = "Build word-embedding synonyms from Japanese job postings")]
#[command(long_about = "Normalize job titles, extract nouns with MeCab, train word embeddings, derive a synonym dictionary and load postings into a search index")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Report format: console, json
    #[arg(long, global = true, default_value = "console")]
    pub report: ReportFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the training corpus from job postings
    Corpus {
        /// Job postings CSV
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Corpus file to write
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Corpus format: lines, jsonl
        #[arg(short, long, default_value = "lines")]
        format: CorpusFormat,
    },

    /// Build the corpus and train word embeddings
    Train {
        /// Job postings CSV
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Train on a corpus written by `corpus` instead of reading postings
        #[arg(long, conflicts_with = "input")]
        corpus: Option<PathBuf>,

        /// Word vectors file to write
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Vector dimensionality
        #[arg(long)]
        size: Option<usize>,

        /// Minimum token frequency
        #[arg(long)]
        min_count: Option<usize>,

        /// Context window size
        #[arg(long)]
        window: Option<usize>,

        /// Training algorithm: skip-gram, cbow
        #[arg(long)]
        algorithm: Option<TrainingAlgorithm>,

        /// Keep the intermediate corpus at the configured corpus path
        #[arg(long)]
        keep_corpus: bool,
    },

    /// Write a synonym dictionary from trained word vectors
    Synonyms {
        /// Word vectors file
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Synonym file to write
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Neighbours per word
        #[arg(short = 'n', long)]
        top_n: Option<usize>,
    },

    /// Show the nearest neighbours of a word
    Similar {
        word: String,

        /// Word vectors file
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Neighbours to show
        #[arg(short = 'n', long)]
        top_n: Option<usize>,
    },

    /// Bulk-load job postings into a search index
    Index {
        /// Target index name
        index: String,

        /// Job postings CSV
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Search engine base URL
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Print the normalized form of a job title
    Normalize {
        title: String,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_train_overrides() {
        let cli = Cli::try_parse_from([
            "job-synonyms", "train", "--size", "200", "--algorithm", "cbow", "--keep-corpus", "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Train { size, algorithm, keep_corpus, window, .. } => {
                assert_eq!(size, Some(200));
                assert_eq!(algorithm, Some(TrainingAlgorithm::Cbow));
                assert!(keep_corpus);
                assert_eq!(window, None);
            }
            _ => panic!("expected train command"),
        }
    }

    #[test]
    fn test_parse_train_from_prebuilt_corpus() {
        let cli = Cli::try_parse_from(["job-synonyms", "train", "--corpus", "data/corpus.jsonl"]).unwrap();
        match cli.command {
            Commands::Train { corpus, input, .. } => {
                assert_eq!(corpus, Some(PathBuf::from("data/corpus.jsonl")));
                assert_eq!(input, None);
            }
            _ => panic!("expected train command"),
        }

        assert!(Cli::try_parse_from(["job-synonyms", "train", "--corpus", "c.txt", "--input", "p.csv"]).is_err());
    }

    #[test]
    fn test_parse_corpus_format_and_report() {
        let cli = Cli::try_parse_from(["job-synonyms", "--report", "json", "corpus", "--format", "jsonl"]).unwrap();

        assert_eq!(cli.report, ReportFormat::Json);
        assert!(matches!(cli.command, Commands::Corpus { format: CorpusFormat::Jsonl, .. }));
        assert!(Cli::try_parse_from(["job-synonyms", "corpus", "--format", "xml"]).is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension(Path::new("data/jobs.CSV"), &["csv"]).is_ok());
        assert!(validate_file_extension(Path::new("data/jobs.xlsx"), &["csv"]).is_err());
        assert!(validate_file_extension(Path::new("data/jobs"), &["csv"]).is_err());
    }
}
