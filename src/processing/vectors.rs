//! Word vectors in word2vec text format

use crate::error::{JobSynonymsError, Result};
use log::{debug, info};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Sentence-boundary token word2vec writes as its first vocabulary entry
pub const SENTENCE_MARKER: &str = "</s>";

/// Trained embeddings, vocabulary kept in file (frequency) order
#[derive(Debug, Clone)]
pub struct WordVectors {
    words: Vec<String>,
    index: HashMap<String, usize>,
    vectors: Vec<Vec<f32>>,
    dim: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimilarWord {
    pub word: String,
    pub score: f32,
}

impl WordVectors {
    pub fn new(dim: usize) -> Self {
        Self {
            words: Vec::new(),
            index: HashMap::new(),
            vectors: Vec::new(),
            dim,
        }
    }

    pub fn insert(&mut self, word: impl Into<String>, vector: Vec<f32>) -> Result<()> {
        let word = word.into();
        if vector.len() != self.dim {
            return Err(JobSynonymsError::Vectors(format!(
                "Vector for '{}' has {} dimensions, expected {}",
                word,
                vector.len(),
                self.dim
            )));
        }
        if self.index.contains_key(&word) {
            return Err(JobSynonymsError::Vectors(format!("Duplicate word: {}", word)));
        }

        self.index.insert(word.clone(), self.words.len());
        self.words.push(word);
        self.vectors.push(vector);
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading word vectors from: {}", path.display());
        let file = File::open(path).map_err(|e| {
            JobSynonymsError::Vectors(format!("Failed to open {}: {}", path.display(), e))
        })?;
        let vectors = Self::read_from(BufReader::new(file))?;
        info!("Loaded {} words ({} dimensions)", vectors.len(), vectors.dim());
        Ok(vectors)
    }

    /// Parse `<count> <dim>` then one `word v1 .. vdim` line per word.
    /// The `</s>` sentence marker is not a word and is skipped.
    pub fn read_from<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = reader.lines();

        let header = lines
            .next()
            .ok_or_else(|| JobSynonymsError::Vectors("Empty vectors file".to_string()))??;
        let (count, dim) = parse_header(&header)?;

        let mut vectors = Self::new(dim);
        for (i, line) in lines.enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            // The last `dim` fields are the vector, anything before them is the word
            let fields: Vec<&str> = line.trim_end().split(' ').collect();
            if fields.len() < dim + 1 {
                return Err(JobSynonymsError::Vectors(format!(
                    "Line {}: expected {} values, found {}",
                    i + 2,
                    dim,
                    fields.len().saturating_sub(1)
                )));
            }
            let split = fields.len() - dim;
            let word = fields[..split].join(" ");
            if word == SENTENCE_MARKER {
                continue;
            }
            let vector = fields[split..]
                .iter()
                .map(|v| v.parse::<f32>())
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| JobSynonymsError::Vectors(format!("Line {}: {}", i + 2, e)))?;

            vectors.insert(word, vector)?;
        }

        if vectors.len() != count && vectors.len() + 1 != count {
            debug!("Header announced {} words, read {}", count, vectors.len());
        }

        Ok(vectors)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(writer, "{} {}", self.words.len(), self.dim)?;
        for (word, vector) in self.words.iter().zip(&self.vectors) {
            write!(writer, "{}", word)?;
            for value in vector {
                write!(writer, " {}", value)?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.words
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    pub fn vector(&self, word: &str) -> Option<&[f32]> {
        self.index.get(word).map(|&i| self.vectors[i].as_slice())
    }

    /// Exact cosine search over the whole vocabulary, excluding the query word.
    /// Ties keep vocabulary order.
    pub fn most_similar(&self, word: &str, top_n: usize) -> Result<Vec<SimilarWord>> {
        let &query_index = self
            .index
            .get(word)
            .ok_or_else(|| JobSynonymsError::UnknownWord(word.to_string()))?;
        let query = &self.vectors[query_index];

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != query_index)
            .map(|(i, vector)| (i, cosine_similarity(query, vector)))
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        Ok(scored
            .into_iter()
            .take(top_n)
            .map(|(i, score)| SimilarWord {
                word: self.words[i].clone(),
                score,
            })
            .collect())
    }
}

fn parse_header(header: &str) -> Result<(usize, usize)> {
    let mut parts = header.split_whitespace();
    let parsed = (
        parts.next().and_then(|p| p.parse::<usize>().ok()),
        parts.next().and_then(|p| p.parse::<usize>().ok()),
    );
    match parsed {
        (Some(count), Some(dim)) if dim > 0 => Ok((count, dim)),
        _ => Err(JobSynonymsError::Vectors(format!("Invalid header: {:?}", header))),
    }
}

/// Cosine similarity; zero when either vector has zero norm
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = "4 2\nエンジニア 1.0 0.0\nプログラマ 0.9 0.1\n営業 0.0 1.0\nsenior role 0.7 0.7\n";

    #[test]
    fn test_read_keeps_file_order() {
        let vectors = WordVectors::read_from(SAMPLE.as_bytes()).unwrap();

        assert_eq!(vectors.len(), 4);
        assert_eq!(vectors.dim(), 2);
        assert_eq!(vectors.vocabulary()[0], "エンジニア");
        assert_eq!(vectors.vocabulary()[3], "senior role");
        assert_eq!(vectors.vector("営業"), Some(&[0.0, 1.0][..]));
    }

    #[test]
    fn test_sentence_marker_is_not_vocabulary() {
        let data = "3 2\n</s> 0.5 0.5\nrust 1.0 0.0\ngo 0.9 0.1\n";
        let vectors = WordVectors::read_from(data.as_bytes()).unwrap();

        assert_eq!(vectors.vocabulary(), ["rust", "go"]);
        assert!(!vectors.contains(SENTENCE_MARKER));

        let similar = vectors.most_similar("rust", 2).unwrap();
        assert_eq!(similar.len(), 1);
        assert_eq!(similar[0].word, "go");
    }

    #[test]
    fn test_most_similar_excludes_query() {
        let vectors = WordVectors::read_from(SAMPLE.as_bytes()).unwrap();
        let similar = vectors.most_similar("エンジニア", 2).unwrap();

        let words: Vec<&str> = similar.iter().map(|s| s.word.as_str()).collect();
        assert_eq!(words, vec!["プログラマ", "senior role"]);
        assert!(similar[0].score > similar[1].score);
    }

    #[test]
    fn test_most_similar_ties_keep_vocabulary_order() {
        let mut vectors = WordVectors::new(2);
        vectors.insert("q", vec![1.0, 0.0]).unwrap();
        vectors.insert("b", vec![2.0, 0.0]).unwrap();
        vectors.insert("a", vec![3.0, 0.0]).unwrap();

        let similar = vectors.most_similar("q", 5).unwrap();
        let words: Vec<&str> = similar.iter().map(|s| s.word.as_str()).collect();
        assert_eq!(words, vec!["b", "a"]);
    }

    #[test]
    fn test_unknown_word() {
        let vectors = WordVectors::read_from(SAMPLE.as_bytes()).unwrap();
        assert!(matches!(
            vectors.most_similar("デザイナー", 5),
            Err(JobSynonymsError::UnknownWord(_))
        ));
    }

    #[test]
    fn test_bad_input_rejected() {
        assert!(WordVectors::read_from("".as_bytes()).is_err());
        assert!(WordVectors::read_from("x y\n".as_bytes()).is_err());
        assert!(WordVectors::read_from("1 3\nword 1.0 2.0\n".as_bytes()).is_err());
        assert!(WordVectors::read_from("1 2\nword 1.0 abc\n".as_bytes()).is_err());
        assert!(WordVectors::read_from("2 1\nw 1.0\nw 2.0\n".as_bytes()).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vectors.vec");
        let vectors = WordVectors::read_from(SAMPLE.as_bytes()).unwrap();

        vectors.save(&path).unwrap();
        let loaded = WordVectors::load(&path).unwrap();

        assert_eq!(loaded.vocabulary(), vectors.vocabulary());
        assert_eq!(loaded.vector("プログラマ"), vectors.vector("プログラマ"));
    }

    #[test]
    fn test_cosine_zero_vector() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert!((cosine_similarity(&[1.0, 0.0], &[2.0, 0.0]) - 1.0).abs() < 1e-6);
    }
}
