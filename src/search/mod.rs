//! Search index loading

pub mod client;

pub use client::{IndexClient, IndexStats, SearchDocument};
