//! # Matcher
//!
//! Scans a normalized token stream against a [`GroupIndex`] and produces
//! ordered, non-overlapping match spans.
//!
//! ## Overlap Policy
//!
//! Greedy longest match, left to right:
//!
//! ```text
//! pos = 0
//! while pos < tokens:
//!   candidates = index phrases starting with tokens[pos]   (longest first)
//!   winner = first candidate fully matching at pos
//!   if winner: record span [pos, pos + len - 1], pos += len
//!   else:      pos += 1
//! ```
//!
//! A token never belongs to two spans. A phrase defined by several groups
//! yields one span owned by all of them. Matching compares whole normalized
//! tokens only, so "soy" does not match inside "soybean".

use crate::group_index::GroupIndex;
use crate::group_store::GroupId;
use crate::normalizer::{Normalizer, Token};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::trace;

/// A contiguous run of tokens attributed to one or more word groups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSpan {
    /// Index of the first token
    pub start: usize,
    /// Index of the last token (inclusive)
    pub end: usize,
    /// Owning groups, in store order
    pub groups: Vec<GroupId>,
    /// Number of tokens covered
    pub len: usize,
    /// Canonical matched phrase
    pub phrase: String,
    /// Source text covered by the span
    pub surface: String,
    /// Starting byte offset in the source text
    pub byte_start: usize,
    /// Ending byte offset (exclusive) in the source text
    pub byte_end: usize,
}

impl MatchSpan {
    /// Whether the span covers token `index`
    pub fn contains_token(&self, index: usize) -> bool {
        (self.start..=self.end).contains(&index)
    }

    /// Whether `group` owns this span
    pub fn is_owned_by(&self, group: &GroupId) -> bool {
        self.groups.contains(group)
    }
}

/// Find all matches of `index` phrases in `tokens`
///
/// The `surface` of each span joins the covered tokens' surface forms with a
/// single space; [`crate::scanner::Scanner`] replaces it with the exact source
/// slice.
pub fn find_matches(tokens: &[Token], index: &GroupIndex) -> Vec<MatchSpan> {
    let mut matches = Vec::new();
    if index.is_empty() {
        return matches;
    }

    let mut pos = 0;
    while pos < tokens.len() {
        let winner = index
            .candidates(&tokens[pos].normalized)
            .iter()
            .find(|entry| entry.matches_at(tokens, pos));

        match winner {
            Some(entry) => {
                let end = pos + entry.len() - 1;
                let covered = &tokens[pos..=end];
                trace!(start = pos, end, phrase = %entry.phrase(), owners = entry.groups.len(), "Phrase matched");

                matches.push(MatchSpan {
                    start: pos,
                    end,
                    groups: entry.groups.clone(),
                    len: entry.len(),
                    phrase: entry.phrase(),
                    surface: covered
                        .iter()
                        .map(|t| t.surface.as_str())
                        .collect::<Vec<_>>()
                        .join(" "),
                    byte_start: covered[0].start,
                    byte_end: covered[covered.len() - 1].end,
                });
                pos = end + 1;
            }
            None => pos += 1,
        }
    }

    matches
}

/// Owns a shared index snapshot together with the normalizer it implies
#[derive(Debug, Clone)]
pub struct Matcher {
    index: Arc<GroupIndex>,
    normalizer: Normalizer,
}

impl Matcher {
    /// Create a matcher over an index snapshot
    pub fn new(index: Arc<GroupIndex>) -> Self {
        let normalizer = index.normalizer();
        Self { index, normalizer }
    }

    /// The index this matcher consults
    pub fn index(&self) -> &GroupIndex {
        &self.index
    }

    /// Tokenize text, keeping the index's hyphenated compounds whole
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        self.normalizer.normalize(text)
    }

    /// Find all matches in an already tokenized text
    pub fn find_matches(&self, tokens: &[Token]) -> Vec<MatchSpan> {
        find_matches(tokens, &self.index)
    }
}
