//! # Ingredient Scanner
//!
//! Ingredient detection engine for recognized food-label text. It normalizes
//! OCR output into tokens, matches single- and multi-word ingredient phrases
//! from user-configurable word groups (allergens, preservatives, sweeteners,
//! ...), and reports non-overlapping match spans plus per-word statistics.

pub mod cache;
pub mod config;
pub mod default_groups;
pub mod errors;
pub mod group_index;
pub mod group_store;
pub mod lexical;
pub mod matcher;
pub mod normalizer;
pub mod observability;
pub mod scanner;
pub mod validation;

// Re-export types for easier access
pub use group_index::GroupIndex;
pub use group_store::{GroupId, GroupStore, WordGroup};
pub use lexical::WordStats;
pub use matcher::MatchSpan;
pub use normalizer::Token;
pub use scanner::{scan, word_detail, ScanResult, Scanner};
