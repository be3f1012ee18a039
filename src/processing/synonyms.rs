//! Synonym dictionary generation from trained word vectors
//!
//! Output follows the Solr/Elasticsearch explicit mapping syntax, one
//! `word=>a,b,c` rule per vocabulary word.

use crate::error::Result;
use crate::processing::extractor::NounExtractor;
use crate::processing::tagger::Tagger;
use crate::processing::vectors::WordVectors;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use serde::Serialize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Vocabulary words sent to the tagger per call
const SEGMENT_BATCH: usize = 1000;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SynonymStats {
    pub rules: usize,
    pub neighbours: usize,
    pub failed_words: usize,
}

/// `word=>entry,entry,...`; the first entry is the word's own segmentation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynonymRule {
    pub word: String,
    pub entries: Vec<String>,
}

impl fmt::Display for SynonymRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rhs: Vec<String> = self.entries.iter().map(|e| escape(e)).collect();
        write!(f, "{}=>{}", escape(&self.word), rhs.join(","))
    }
}

pub struct SynonymGenerator<'a, T> {
    vectors: &'a WordVectors,
    segmenter: &'a NounExtractor<T>,
    top_n: usize,
    show_progress: bool,
    segmentations: RefCell<HashMap<String, String>>,
}

impl<'a, T: Tagger> SynonymGenerator<'a, T> {
    pub fn new(vectors: &'a WordVectors, segmenter: &'a NounExtractor<T>, top_n: usize) -> Self {
        Self {
            vectors,
            segmenter,
            top_n,
            show_progress: false,
            segmentations: RefCell::new(HashMap::new()),
        }
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Segmentation of a word; each word reaches the tagger at most once
    fn segmentation(&self, word: &str) -> Result<String> {
        if let Some(cached) = self.segmentations.borrow().get(word) {
            return Ok(cached.clone());
        }
        let segmented = self.segmenter.segment(word)?;
        self.segmentations
            .borrow_mut()
            .insert(word.to_string(), segmented.clone());
        Ok(segmented)
    }

    /// Segment the vocabulary ahead of rule writing, one tagger call per batch
    fn prefetch(&self, vocabulary: &[String]) {
        for batch in vocabulary.chunks(SEGMENT_BATCH) {
            let words: Vec<&str> = batch.iter().map(String::as_str).collect();
            match self.segmenter.segment_lines(&words) {
                Ok(segmented) => {
                    let mut cache = self.segmentations.borrow_mut();
                    for (word, segmentation) in words.into_iter().zip(segmented) {
                        cache.insert(word.to_string(), segmentation);
                    }
                }
                Err(e) => warn!("Batch segmentation failed, retrying word by word: {}", e),
            }
        }
        debug!("Segmented {} vocabulary words", self.segmentations.borrow().len());
    }

    /// Rule for one vocabulary word: its own segmentation first, then its neighbours'
    pub fn rule_for(&self, word: &str) -> Result<SynonymRule> {
        let head = self.segmentation(word)?;
        let mut entries = vec![if head.is_empty() { word.to_string() } else { head }];

        for similar in self.vectors.most_similar(word, self.top_n)? {
            let segmented = self.segmentation(&similar.word)?;
            if !segmented.is_empty() {
                entries.push(segmented);
            }
        }

        Ok(SynonymRule {
            word: word.to_string(),
            entries,
        })
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<SynonymStats> {
        let vocabulary = self.vectors.vocabulary();
        self.prefetch(vocabulary);

        let progress = if self.show_progress {
            let bar = ProgressBar::new(vocabulary.len() as u64);
            bar.set_style(
                ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} words ({eta})")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar
        } else {
            ProgressBar::hidden()
        };

        let mut stats = SynonymStats::default();
        for word in vocabulary {
            progress.inc(1);
            // A blank word cannot be the left-hand side of a rule
            if word.trim().is_empty() {
                continue;
            }

            match self.rule_for(word) {
                Ok(rule) => {
                    stats.neighbours += rule.entries.len() - 1;
                    stats.rules += 1;
                    writeln!(writer, "{}", rule)?;
                }
                Err(e) => {
                    warn!("No synonym rule for '{}': {}", word, e);
                    stats.failed_words += 1;
                }
            }
        }
        progress.finish_and_clear();

        Ok(stats)
    }

    pub fn write(&self, path: &Path) -> Result<SynonymStats> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        let stats = self.write_to(&mut writer)?;
        writer.flush()?;

        info!("Wrote {} synonym rules to {}", stats.rules, path.display());
        Ok(stats)
    }
}

/// Backslash-escape the characters the synonym parser splits on
fn escape(entry: &str) -> String {
    let mut escaped = String::with_capacity(entry.len());
    for c in entry.chars() {
        if matches!(c, '\\' | ',' | '=') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
