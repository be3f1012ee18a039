//! Text processing: title normalization, noun extraction, corpus building,
//! embedding training and synonym generation

pub mod document;
pub mod normalizer;
pub mod tagger;
pub mod extractor;
pub mod converter;
pub mod corpus;
pub mod trainer;
pub mod vectors;
pub mod synonyms;

pub use converter::DocumentConverter;
pub use document::{JobPosting, TokenList, TrainingDocument};
pub use extractor::NounExtractor;
pub use normalizer::{normalize_title, TitleNormalizer};
pub use tagger::{MecabTagger, TaggedRecord, Tagger};
