//! # Scanner
//!
//! Boundary operations used by the screens around the engine:
//!
//! - [`scan`] / [`Scanner::scan`]: recognized text plus groups in, tokens and
//!   match spans out
//! - [`Scanner::scan_with_index`]: the same against a prebuilt (possibly
//!   cached) index
//! - [`word_detail`]: statistics for a selected word

use crate::config::EngineConfig;
use crate::group_index::GroupIndex;
use crate::group_store::{GroupId, WordGroup};
use crate::lexical::{analyze, WordStats};
use crate::matcher::{find_matches, MatchSpan};
use crate::normalizer::Token;
use crate::observability::record_scan_metrics;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

/// Tokens and matches of one scanned text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Matches, sorted by start token and non-overlapping
    pub matches: Vec<MatchSpan>,
    /// All tokens of the text
    pub tokens: Vec<Token>,
}

impl ScanResult {
    /// Check if nothing matched
    pub fn is_clean(&self) -> bool {
        self.matches.is_empty()
    }

    /// The span covering token `index`, if any
    pub fn match_for_token(&self, index: usize) -> Option<&MatchSpan> {
        // Spans are sorted and disjoint
        let pos = self.matches.partition_point(|m| m.end < index);
        self.matches.get(pos).filter(|m| m.contains_token(index))
    }

    /// Whether token `index` is part of a match
    pub fn is_token_matched(&self, index: usize) -> bool {
        self.match_for_token(index).is_some()
    }

    /// Number of tokens covered by matches
    pub fn matched_token_count(&self) -> usize {
        self.matches.iter().map(|m| m.len).sum()
    }

    /// Number of spans owned by each group, in order of first appearance
    pub fn group_counts(&self) -> Vec<(GroupId, usize)> {
        let mut counts: Vec<(GroupId, usize)> = Vec::new();
        for span in &self.matches {
            for group in &span.groups {
                match counts.iter_mut().find(|(id, _)| id == group) {
                    Some((_, count)) => *count += 1,
                    None => counts.push((group.clone(), 1)),
                }
            }
        }
        counts
    }

    /// Statistics for the token at `index`
    pub fn token_detail(&self, index: usize) -> Option<WordStats> {
        crate::lexical::analyze_token(&self.tokens, index)
    }
}

/// Entry point for scanning recognized label text
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    config: EngineConfig,
}

impl Scanner {
    /// Create a scanner with a custom engine configuration
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Engine configuration in use
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build an index over the enabled `groups` and scan `raw_text` with it
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ingredient_scanner::group_store::GroupStore;
    /// use ingredient_scanner::scanner::Scanner;
    ///
    /// let store = GroupStore::with_default_groups()?;
    /// let result = Scanner::default().scan("Sugar, PALM OIL, soy lecithin", store.groups());
    ///
    /// let phrases: Vec<&str> = result.matches.iter().map(|m| m.phrase.as_str()).collect();
    /// assert_eq!(phrases, vec!["palm oil", "soy", "lecithin"]);
    /// assert_eq!(result.matches[0].surface, "PALM OIL");
    /// # Ok::<(), ingredient_scanner::errors::AppError>(())
    /// ```
    pub fn scan(&self, raw_text: &str, groups: &[WordGroup]) -> ScanResult {
        let index = GroupIndex::build(groups, &self.config);
        self.scan_with_index(raw_text, &index)
    }

    /// Scan `raw_text` against a prebuilt index
    ///
    /// The index is used as given; a caller holding a store must check
    /// [`crate::group_store::GroupStore::is_current`] (or go through
    /// [`crate::cache::IndexCache`]) to avoid matching with a stale index.
    pub fn scan_with_index(&self, raw_text: &str, index: &GroupIndex) -> ScanResult {
        let start_time = Instant::now();

        let tokens = index.normalizer().normalize(raw_text);
        let mut matches = find_matches(&tokens, index);
        for span in &mut matches {
            span.surface = raw_text[span.byte_start..span.byte_end].to_string();
        }

        let duration = start_time.elapsed();
        record_scan_metrics(tokens.len(), matches.len(), duration);
        debug!(
            text_length = raw_text.len(),
            token_count = tokens.len(),
            match_count = matches.len(),
            duration_us = duration.as_micros() as u64,
            "Scanned text"
        );
        if !matches.is_empty() {
            info!(match_count = matches.len(), "Flagged ingredients in scanned text");
        }

        ScanResult { matches, tokens }
    }
}

/// Scan `raw_text` against the enabled `groups` with the default configuration
pub fn scan(raw_text: &str, groups: &[WordGroup]) -> ScanResult {
    Scanner::default().scan(raw_text, groups)
}

/// Statistics for a word selected in the detail view
pub fn word_detail(word: &str, position: usize, total_words: usize) -> WordStats {
    analyze(word, position, total_words)
}
