//! Noun extraction on top of a morphological tagger

use crate::config::TaggerConfig;
use crate::error::Result;
use crate::processing::tagger::{parse_tagger_output, Tagger};
use log::debug;

pub struct NounExtractor<T> {
    tagger: T,
    noun_tag: String,
    eos_marker: String,
}

impl<T: Tagger> NounExtractor<T> {
    pub fn new(tagger: T, config: &TaggerConfig) -> Self {
        Self {
            tagger,
            noun_tag: config.noun_tag.clone(),
            eos_marker: config.eos_marker.clone(),
        }
    }

    pub fn with_noun_tag(mut self, noun_tag: impl Into<String>) -> Self {
        self.noun_tag = noun_tag.into();
        self
    }

    pub fn tagger(&self) -> &T {
        &self.tagger
    }

    /// Nouns in source order, lowercased and trimmed, duplicates kept.
    ///
    /// Only a failing tagger call is an error; empty input and malformed
    /// records yield fewer tokens instead.
    pub fn extract_nouns(&self, text: &str) -> Result<Vec<String>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let output = self.tagger.tag(text)?;

        Ok(parse_tagger_output(&output, &self.eos_marker)
            .into_iter()
            .filter(|record| record.pos == self.noun_tag)
            .map(|record| record.surface.trim().to_lowercase())
            .filter(|token| !token.is_empty())
            .collect())
    }

    /// Every record's surface joined by single spaces, regardless of part of speech
    pub fn segment(&self, text: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let output = self.tagger.tag(text)?;
        Ok(self.join_surfaces(&output))
    }

    /// Segment many single-line texts with one tagger call.
    ///
    /// The tagger must close every input line with its own end marker; when
    /// the output does not line up with the input, each text is segmented on
    /// its own instead.
    pub fn segment_lines(&self, texts: &[&str]) -> Result<Vec<String>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        if texts.iter().any(|text| text.contains(['\n', '\r'])) {
            return texts.iter().map(|text| self.segment(text)).collect();
        }

        let output = self.tagger.tag(&texts.join("\n"))?;
        let lines: Vec<&str> = output.lines().filter(|line| !line.trim().is_empty()).collect();
        let aligned = lines.len() == texts.len()
            && lines
                .iter()
                .all(|line| line.trim_end().rsplit('\t').next() == Some(self.eos_marker.as_str()));

        if !aligned {
            debug!(
                "Tagger answered {} lines for {} texts; segmenting one by one",
                lines.len(),
                texts.len()
            );
            return texts.iter().map(|text| self.segment(text)).collect();
        }

        Ok(lines.into_iter().map(|line| self.join_surfaces(line)).collect())
    }

    fn join_surfaces(&self, output: &str) -> String {
        parse_tagger_output(output, &self.eos_marker)
            .into_iter()
            .map(|record| record.surface.trim().to_string())
            .filter(|surface| !surface.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
