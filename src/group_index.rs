//! # Group Index
//!
//! Compiles the enabled word groups into a lookup keyed by each phrase's first
//! token, so the matcher only considers phrases that can start at a given
//! position instead of scanning every group word for every token.
//!
//! ## Build Algorithm
//!
//! ```text
//! For each enabled group (store order):
//!   For each phrase: split into tokens (hyphenated words kept whole)
//!     Skip phrases with no tokens or more than max_phrase_length tokens
//!     Merge with an identical phrase from an earlier group (adds an owner)
//! Bucket phrases by first token, longest first within a bucket
//! ```
//!
//! The index is a pure function of its input and is immutable once built, so
//! it can be shared by reference (`Arc<GroupIndex>`) across scans.

use crate::config::EngineConfig;
use crate::group_store::{GroupId, WordGroup};
use crate::normalizer::{phrase_tokens, Normalizer, Token};
use crate::observability::record_index_build_metrics;
use std::collections::{HashMap, HashSet};
use std::time::Instant;
use tracing::{debug, warn};

/// One distinct phrase and the groups that define it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseEntry {
    /// Normalized tokens of the phrase
    pub tokens: Vec<String>,
    /// Owning groups, in store order
    pub groups: Vec<GroupId>,
}

impl PhraseEntry {
    /// Number of tokens the phrase spans
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Always false; entries hold at least one token
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Canonical text of the phrase
    pub fn phrase(&self) -> String {
        self.tokens.join(" ")
    }

    /// Whether the phrase matches `tokens` starting exactly at `start`
    ///
    /// Whole-token equality only; "soy" never matches inside "soybean".
    pub fn matches_at(&self, tokens: &[Token], start: usize) -> bool {
        start + self.tokens.len() <= tokens.len()
            && self
                .tokens
                .iter()
                .zip(&tokens[start..])
                .all(|(expected, token)| *expected == token.normalized)
    }
}

/// First-token lookup over the phrases of all enabled groups
#[derive(Debug, Clone, Default)]
pub struct GroupIndex {
    by_first_token: HashMap<String, Vec<PhraseEntry>>,
    compounds: HashSet<String>,
    phrase_count: usize,
    skipped_phrases: usize,
    max_phrase_tokens: usize,
    source_version: Option<u64>,
}

impl GroupIndex {
    /// Build an index from the enabled groups in `groups`
    ///
    /// Disabled groups contribute nothing regardless of their word lists.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ingredient_scanner::config::EngineConfig;
    /// use ingredient_scanner::group_index::GroupIndex;
    /// use ingredient_scanner::group_store::GroupStore;
    ///
    /// let mut store = GroupStore::new();
    /// store.create_group("Oils", &["palm oil", "fish oil"], "#4CAF50")?;
    ///
    /// let index = GroupIndex::build(store.groups(), &EngineConfig::default());
    /// assert_eq!(index.phrase_count(), 2);
    /// assert!(index.candidates("oil").is_empty());
    /// assert_eq!(index.candidates("palm").len(), 1);
    /// # Ok::<(), ingredient_scanner::errors::AppError>(())
    /// ```
    pub fn build(groups: &[WordGroup], config: &EngineConfig) -> Self {
        let start_time = Instant::now();

        // Distinct phrases in first-seen order
        let mut entries: Vec<PhraseEntry> = Vec::new();
        let mut positions: HashMap<Vec<String>, usize> = HashMap::new();
        let mut skipped_phrases = 0;

        for group in groups.iter().filter(|g| g.enabled) {
            for word in &group.words {
                let tokens = phrase_tokens(word);
                if tokens.is_empty() {
                    warn!(group_id = %group.id, phrase = %word, "Skipping phrase with no tokens");
                    skipped_phrases += 1;
                    continue;
                }
                if tokens.len() > config.max_phrase_length {
                    warn!(
                        group_id = %group.id,
                        phrase = %word,
                        token_count = tokens.len(),
                        max_phrase_length = config.max_phrase_length,
                        "Skipping phrase longer than the configured maximum"
                    );
                    skipped_phrases += 1;
                    continue;
                }

                match positions.get(&tokens) {
                    Some(&position) => {
                        let owners = &mut entries[position].groups;
                        if !owners.contains(&group.id) {
                            owners.push(group.id.clone());
                        }
                    }
                    None => {
                        positions.insert(tokens.clone(), entries.len());
                        entries.push(PhraseEntry {
                            tokens,
                            groups: vec![group.id.clone()],
                        });
                    }
                }
            }
        }

        let phrase_count = entries.len();
        let mut max_phrase_tokens = 0;
        let mut compounds = HashSet::new();
        let mut by_first_token: HashMap<String, Vec<PhraseEntry>> = HashMap::new();

        for entry in entries {
            max_phrase_tokens = max_phrase_tokens.max(entry.len());
            compounds.extend(entry.tokens.iter().filter(|t| t.contains('-')).cloned());
            by_first_token
                .entry(entry.tokens[0].clone())
                .or_default()
                .push(entry);
        }

        // Longest first; the stable sort keeps first-seen order among equals
        for bucket in by_first_token.values_mut() {
            bucket.sort_by(|a, b| b.len().cmp(&a.len()));
        }

        let duration = start_time.elapsed();
        record_index_build_metrics(phrase_count, duration);
        debug!(
            phrase_count,
            skipped_phrases,
            max_phrase_tokens,
            compound_count = compounds.len(),
            duration_us = duration.as_micros() as u64,
            "Built group index"
        );

        Self {
            by_first_token,
            compounds,
            phrase_count,
            skipped_phrases,
            max_phrase_tokens,
            source_version: None,
        }
    }

    /// Stamp the index with the store version it was built from
    pub fn with_source_version(mut self, version: u64) -> Self {
        self.source_version = Some(version);
        self
    }

    /// Store version this index was built from, if known
    pub fn source_version(&self) -> Option<u64> {
        self.source_version
    }

    /// Phrases starting with `first_token`, longest first
    pub fn candidates(&self, first_token: &str) -> &[PhraseEntry] {
        self.by_first_token
            .get(first_token)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of distinct phrases indexed
    pub fn phrase_count(&self) -> usize {
        self.phrase_count
    }

    /// Number of phrases left out (empty or too long)
    pub fn skipped_phrases(&self) -> usize {
        self.skipped_phrases
    }

    /// Token count of the longest indexed phrase
    pub fn max_phrase_tokens(&self) -> usize {
        self.max_phrase_tokens
    }

    /// Check if no phrase is indexed
    pub fn is_empty(&self) -> bool {
        self.phrase_count == 0
    }

    /// Hyphenated phrase tokens that must survive tokenization whole
    pub fn compounds(&self) -> impl Iterator<Item = &str> {
        self.compounds.iter().map(String::as_str)
    }

    /// A normalizer that keeps this index's hyphenated compounds whole
    pub fn normalizer(&self) -> Normalizer {
        Normalizer::with_compounds(self.compounds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group_store::GroupStore;

    fn config() -> EngineConfig {
        EngineConfig::default()
    }

    #[test]
    fn test_empty_index() {
        let index = GroupIndex::build(&[], &config());
        assert!(index.is_empty());
        assert!(index.candidates("milk").is_empty());
        assert_eq!(index.source_version(), None);
    }

    #[test]
    fn test_buckets_sorted_longest_first() {
        let mut store = GroupStore::new();
        store
            .create_group("Fats", &["oil", "hydrogenated oil", "partially hydrogenated oil"], "#4CAF50")
            .unwrap();
        store
            .create_group("Hydro", &["hydrogenated"], "#000000")
            .unwrap();

        let index = GroupIndex::build(store.groups(), &config());
        let lengths: Vec<usize> = index.candidates("hydrogenated").iter().map(|e| e.len()).collect();
        assert_eq!(lengths, vec![2, 1]);
        assert_eq!(index.max_phrase_tokens(), 3);
    }

    #[test]
    fn test_identical_phrases_merge_owners() {
        let mut store = GroupStore::new();
        let a = store.create_group("Preservatives", &["sulfites"], "#9C27B0").unwrap();
        let b = store.create_group("Mine", &["Sulfites"], "#607D8B").unwrap();

        let index = GroupIndex::build(store.groups(), &config());
        assert_eq!(index.phrase_count(), 1);
        assert_eq!(index.candidates("sulfites")[0].groups, vec![a.id, b.id]);
    }

    #[test]
    fn test_disabled_groups_excluded() {
        let mut store = GroupStore::new();
        let group = store.create_group("Allergens", &["milk"], "#F44336").unwrap();
        store.toggle_group(&group.id).unwrap();

        let index = GroupIndex::build(store.groups(), &config());
        assert!(index.is_empty());
    }

    #[test]
    fn test_max_phrase_length_guard() {
        let mut store = GroupStore::new();
        store
            .create_group("Long", &["a b c", "one two"], "#000000")
            .unwrap();

        let cfg = EngineConfig {
            max_phrase_length: 2,
            ..EngineConfig::default()
        };
        let index = GroupIndex::build(store.groups(), &cfg);
        assert_eq!(index.phrase_count(), 1);
        assert_eq!(index.skipped_phrases(), 1);
        assert!(index.candidates("a").is_empty());
    }

    #[test]
    fn test_compounds_collected() {
        let mut store = GroupStore::new();
        store
            .create_group("Claims", &["gluten-free", "sugar free"], "#000000")
            .unwrap();

        let index = GroupIndex::build(store.groups(), &config());
        let compounds: Vec<&str> = index.compounds().collect();
        assert_eq!(compounds, vec!["gluten-free"]);
        assert_eq!(index.normalizer().compound_count(), 1);
    }

    #[test]
    fn test_build_is_idempotent() {
        let store = GroupStore::with_default_groups().unwrap();
        let first = GroupIndex::build(store.groups(), &config());
        let second = GroupIndex::build(store.groups(), &config());
        assert_eq!(first.phrase_count(), second.phrase_count());
        for entry in first.by_first_token.values().flatten() {
            assert_eq!(second.candidates(&entry.tokens[0]), first.candidates(&entry.tokens[0]));
        }
    }
}
