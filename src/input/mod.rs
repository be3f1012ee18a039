//! Input processing module
//! Reads job postings from CSV files

pub mod postings;

pub use postings::{PostingReader, PostingRow};
