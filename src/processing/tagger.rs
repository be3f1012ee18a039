//! Morphological tagger boundary
//!
//! A tagger turns raw text into a flat string of tab-separated `pos,surface`
//! records closed by an end marker. Parsing that string lives here so every
//! tagger implementation shares the same tolerance for malformed records.

use crate::config::TaggerConfig;
use crate::error::{JobSynonymsError, Result};
use log::{debug, warn};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Single-method capability: tag text, return the raw record stream
pub trait Tagger {
    fn tag(&self, text: &str) -> Result<String>;
}

impl<T: Tagger + ?Sized> Tagger for &T {
    fn tag(&self, text: &str) -> Result<String> {
        (**self).tag(text)
    }
}

impl<T: Tagger + ?Sized> Tagger for Box<T> {
    fn tag(&self, text: &str) -> Result<String> {
        (**self).tag(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedRecord {
    pub pos: String,
    pub surface: String,
}

impl TaggedRecord {
    /// Split a `pos,surface` record. Extra commas stay in the surface.
    pub fn parse(record: &str) -> Result<Self> {
        match record.split_once(',') {
            Some((pos, surface)) if !pos.trim().is_empty() => Ok(Self {
                pos: pos.trim().to_string(),
                surface: surface.to_string(),
            }),
            _ => Err(JobSynonymsError::MalformedRecord(record.to_string())),
        }
    }
}

/// Split raw tagger output into records, dropping end markers and blanks.
///
/// Records are delimited by tabs; newlines are treated the same way because
/// MeCab closes every input line with its own end marker.
pub fn parse_tagger_output(output: &str, eos_marker: &str) -> Vec<TaggedRecord> {
    let mut records = Vec::new();

    for raw in output.split(['\t', '\n']) {
        let raw = raw.trim_end_matches('\r');
        if raw.trim().is_empty() || raw.trim() == eos_marker {
            continue;
        }

        match TaggedRecord::parse(raw) {
            Ok(record) => records.push(record),
            Err(e) => warn!("Skipping tagger record: {}", e),
        }
    }

    records
}

/// Runs a MeCab-compatible executable once per call.
///
/// Output format is forced to `pos,base_form\t` with unknown words emitted as
/// `<unknown_tag>,surface\t`.
pub struct MecabTagger {
    command: String,
    dictionary_dir: Option<PathBuf>,
    unknown_tag: String,
    eos_marker: String,
}

impl MecabTagger {
    pub fn new(command: impl Into<String>) -> Self {
        let defaults = TaggerConfig::default();
        Self {
            command: command.into(),
            dictionary_dir: None,
            unknown_tag: defaults.unknown_tag,
            eos_marker: defaults.eos_marker,
        }
    }

    pub fn from_config(config: &TaggerConfig) -> Self {
        Self {
            command: config.command.clone(),
            dictionary_dir: config.dictionary_dir.clone(),
            unknown_tag: config.unknown_tag.clone(),
            eos_marker: config.eos_marker.clone(),
        }
    }

    pub fn with_dictionary(mut self, dictionary_dir: impl Into<PathBuf>) -> Self {
        self.dictionary_dir = Some(dictionary_dir.into());
        self
    }

    /// Command-line arguments; `\t` and `\n` are MeCab format escapes, not literal characters
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "-F".to_string(),
            r"%f[0],%f[6]\t".to_string(),
            "-U".to_string(),
            format!(r"{},%m\t", self.unknown_tag),
            "-E".to_string(),
            format!(r"{}\n", self.eos_marker),
        ];

        if let Some(dir) = &self.dictionary_dir {
            args.push("-d".to_string());
            args.push(dir.to_string_lossy().to_string());
        }

        args
    }
}

impl Tagger for MecabTagger {
    fn tag(&self, text: &str) -> Result<String> {
        debug!("Tagging {} bytes with {}", text.len(), self.command);

        let mut child = Command::new(&self.command)
            .args(self.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| JobSynonymsError::Tagger(format!("Failed to start '{}': {}", self.command, e)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| JobSynonymsError::Tagger("Tagger stdin unavailable".to_string()))?;

        // Feed stdin from a separate thread so a full stdout pipe cannot deadlock us
        let mut input = text.to_string();
        if !input.ends_with('\n') {
            input.push('\n');
        }
        let writer = std::thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child.wait_with_output()?;

        writer
            .join()
            .map_err(|_| JobSynonymsError::Tagger("Tagger input writer panicked".to_string()))??;

        if !output.status.success() {
            return Err(JobSynonymsError::Tagger(format!(
                "'{}' exited with {}: {}",
                self.command,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| JobSynonymsError::Tagger(format!("Tagger produced invalid UTF-8: {}", e)))
    }
}
