//! Training corpus assembly and serialization

use crate::error::{JobSynonymsError, Result};
use crate::processing::converter::DocumentConverter;
use crate::processing::document::{JobPosting, TokenList};
use crate::processing::tagger::Tagger;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorpusFormat {
    /// Space-separated tokens, one sentence per line
    Lines,
    /// One JSON array per line
    Jsonl,
}

impl std::str::FromStr for CorpusFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lines" | "txt" | "text" => Ok(CorpusFormat::Lines),
            "jsonl" | "json" => Ok(CorpusFormat::Jsonl),
            _ => Err(format!("Invalid corpus format: {}. Supported: lines, jsonl", s)),
        }
    }
}

impl CorpusFormat {
    /// `.jsonl`/`.json` files are JSON lines, anything else is plain lines
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()).map(str::to_lowercase).as_deref() {
            Some("jsonl") | Some("json") => CorpusFormat::Jsonl,
            _ => CorpusFormat::Lines,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CorpusStats {
    pub postings_read: usize,
    pub postings_skipped: usize,
    pub sentences: usize,
    pub empty_sentences: usize,
    pub tokens: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub sentences: Vec<TokenList>,
    pub stats: CorpusStats,
}

pub struct CorpusBuilder<T> {
    converter: DocumentConverter<T>,
    show_progress: bool,
}

impl<T: Tagger> CorpusBuilder<T> {
    pub fn new(converter: DocumentConverter<T>) -> Self {
        Self {
            converter,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn converter(&self) -> &DocumentConverter<T> {
        &self.converter
    }

    /// Convert every posting; a posting whose tagging fails is skipped and counted
    pub fn build(&self, postings: &[JobPosting]) -> Corpus {
        let progress = if self.show_progress {
            let bar = ProgressBar::new(postings.len() as u64);
            bar.set_style(
                ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} postings ({eta})")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar
        } else {
            ProgressBar::hidden()
        };

        let mut corpus = Corpus::default();

        for (i, posting) in postings.iter().enumerate() {
            corpus.stats.postings_read += 1;
            progress.inc(1);

            let document = match self.converter.convert(posting) {
                Ok(document) => document,
                Err(e) => {
                    warn!("Skipping posting {}: {}", i, e);
                    corpus.stats.postings_skipped += 1;
                    continue;
                }
            };

            corpus.stats.tokens += document.token_count();
            for sentence in document.into_sentences() {
                if sentence.is_empty() {
                    corpus.stats.empty_sentences += 1;
                }
                corpus.sentences.push(sentence);
            }
        }

        progress.finish_and_clear();
        corpus.stats.sentences = corpus.sentences.len();

        info!(
            "Built corpus: {} sentences, {} tokens from {} postings ({} skipped)",
            corpus.stats.sentences, corpus.stats.tokens, corpus.stats.postings_read, corpus.stats.postings_skipped
        );

        corpus
    }
}

impl Corpus {
    pub fn write(&self, path: &Path, format: CorpusFormat) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer, format)?;
        writer.flush()?;

        debug!("Wrote {} sentences to {}", self.sentences.len(), path.display());
        Ok(())
    }

    pub fn write_to<W: Write>(&self, writer: &mut W, format: CorpusFormat) -> Result<()> {
        for sentence in &self.sentences {
            match format {
                CorpusFormat::Lines => writeln!(writer, "{}", line_sentence(sentence))?,
                CorpusFormat::Jsonl => {
                    serde_json::to_writer(&mut *writer, sentence)?;
                    writeln!(writer)?;
                }
            }
        }
        Ok(())
    }

    /// Corpus over already tokenized sentences
    pub fn from_sentences(sentences: Vec<TokenList>) -> Self {
        let stats = CorpusStats {
            sentences: sentences.len(),
            empty_sentences: sentences.iter().filter(|s| s.is_empty()).count(),
            tokens: sentences.iter().map(Vec::len).sum(),
            ..CorpusStats::default()
        };
        Self { sentences, stats }
    }

    /// Read a corpus written by `write`
    pub fn read(path: &Path, format: CorpusFormat) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let sentences = content
            .lines()
            .enumerate()
            .map(|(i, line)| match format {
                CorpusFormat::Lines => Ok(line.split_whitespace().map(str::to_string).collect()),
                CorpusFormat::Jsonl => serde_json::from_str::<TokenList>(line).map_err(|e| {
                    JobSynonymsError::InvalidInput(format!("{}:{}: {}", path.display(), i + 1, e))
                }),
            })
            .collect::<Result<Vec<_>>>()?;

        info!("Read {} sentences from {}", sentences.len(), path.display());
        Ok(Self::from_sentences(sentences))
    }
}

/// Tokens joined by spaces; whitespace inside a token becomes `_`, empty tokens vanish
fn line_sentence(sentence: &[String]) -> String {
    sentence
        .iter()
        .filter(|token| !token.trim().is_empty())
        .map(|token| token.split_whitespace().collect::<Vec<_>>().join("_"))
        .collect::<Vec<_>>()
        .join(" ")
}
