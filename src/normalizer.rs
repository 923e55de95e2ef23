//! # Normalizer Module
//!
//! This module turns raw recognized label text into a canonical token stream
//! used by the matcher.
//!
//! ## Features
//!
//! - Splits on Unicode whitespace and on list separators common in ingredient
//!   lists (`,` `;` `:` `/` brackets), so OCR output like `WATER,SUGAR` still
//!   yields two tokens
//! - Strips leading and trailing punctuation from every word while keeping
//!   internal punctuation such as apostrophes and periods
//! - Treats hyphens and dashes as separators, except for hyphenated compounds
//!   that a group phrase stores hyphenated (e.g. `gluten-free`), also when the
//!   compound sits inside a longer dashed word such as `gluten-free-oats`
//! - Folds casing to lowercase for matching while keeping the original surface
//!   text and byte/character offsets for display

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::trace;

/// A normalized, offset-tagged unit of text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Position of the token in the token stream
    pub index: usize,
    /// Lowercased form used for matching
    pub normalized: String,
    /// Original text of the token as it appeared in the source
    pub surface: String,
    /// Starting byte offset in the source text
    pub start: usize,
    /// Ending byte offset (exclusive) in the source text
    pub end: usize,
    /// Starting character offset in the source text
    pub char_start: usize,
    /// Ending character offset (exclusive) in the source text
    pub char_end: usize,
}

/// Characters that always separate tokens, in addition to whitespace
const LIST_SEPARATORS: &[char] = &[',', ';', ':', '(', ')', '[', ']', '{', '}', '/', '|', '•'];

/// Characters treated as hyphens
const DASHES: &[char] = &[
    '-', '\u{2010}', '\u{2011}', '\u{2012}', '\u{2013}', '\u{2014}', '\u{2212}',
];

fn is_separator(c: char) -> bool {
    c.is_whitespace() || LIST_SEPARATORS.contains(&c)
}

fn is_dash(c: char) -> bool {
    DASHES.contains(&c)
}

/// Lowercase a word and map every dash variant to `-`
fn fold(word: &str) -> String {
    word.chars()
        .map(|c| if is_dash(c) { '-' } else { c })
        .collect::<String>()
        .to_lowercase()
}

/// Split a char-indexed text into separator-delimited runs, as `[start, end)` char ranges
fn runs(chars: &[(usize, char)]) -> Vec<(usize, usize)> {
    let mut result = Vec::new();
    let mut run_start: Option<usize> = None;

    for (i, &(_, c)) in chars.iter().enumerate() {
        if is_separator(c) {
            if let Some(start) = run_start.take() {
                result.push((start, i));
            }
        } else if run_start.is_none() {
            run_start = Some(i);
        }
    }

    if let Some(start) = run_start {
        result.push((start, chars.len()));
    }

    result
}

/// Narrow a char range to its first and last alphanumeric characters
fn trim_range(chars: &[(usize, char)], mut start: usize, mut end: usize) -> Option<(usize, usize)> {
    while start < end && !chars[start].1.is_alphanumeric() {
        start += 1;
    }
    while end > start && !chars[end - 1].1.is_alphanumeric() {
        end -= 1;
    }
    (start < end).then_some((start, end))
}

/// Canonicalize a stored phrase: its index tokens joined by single spaces
///
/// Two phrases with the same canonical form match exactly the same text, so
/// the store uses it to keep a group's phrases distinct. Edge punctuation is
/// dropped and dash variants fold to `-`.
///
/// # Examples
///
/// ```rust
/// use ingredient_scanner::normalizer::normalize_phrase;
///
/// assert_eq!(normalize_phrase("  Sodium   Benzoate "), "sodium benzoate");
/// assert_eq!(normalize_phrase("(Milk)."), "milk");
/// assert_eq!(normalize_phrase("Gluten\u{2013}Free"), "gluten-free");
/// ```
pub fn normalize_phrase(phrase: &str) -> String {
    phrase_tokens(phrase).join(" ")
}

/// Split a phrase into the tokens the index stores for it
///
/// Uses the same separators and punctuation trimming as [`Normalizer::normalize`],
/// but hyphenated words stay whole: a phrase stored hyphenated is a compound.
///
/// # Examples
///
/// ```rust
/// use ingredient_scanner::normalizer::phrase_tokens;
///
/// assert_eq!(phrase_tokens("Tree Nut"), vec!["tree", "nut"]);
/// assert_eq!(phrase_tokens("gluten-free"), vec!["gluten-free"]);
/// assert!(phrase_tokens(" ,. ").is_empty());
/// ```
pub fn phrase_tokens(phrase: &str) -> Vec<String> {
    let chars: Vec<(usize, char)> = phrase.char_indices().collect();
    runs(&chars)
        .into_iter()
        .filter_map(|(start, end)| trim_range(&chars, start, end))
        .map(|(start, end)| {
            let word: String = chars[start..end].iter().map(|&(_, c)| c).collect();
            fold(&word)
        })
        .collect()
}

/// Tokenizer for recognized label text
///
/// A `Normalizer` is pure: the same input always yields the same tokens and
/// offsets. Its only configuration is the set of hyphenated compounds that
/// must be kept as single tokens.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    compounds: HashSet<String>,
}

impl Normalizer {
    /// Create a normalizer that splits every hyphenated word
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a normalizer that keeps the given hyphenated compounds whole
    ///
    /// Compounds are compared after lowercasing and dash folding.
    pub fn with_compounds<I, S>(compounds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            compounds: compounds
                .into_iter()
                .map(|c| fold(c.as_ref()))
                .filter(|c| c.contains('-'))
                .collect(),
        }
    }

    /// Number of hyphenated compounds this normalizer keeps whole
    pub fn compound_count(&self) -> usize {
        self.compounds.len()
    }

    /// Turn raw text into an ordered sequence of tokens
    ///
    /// Empty or punctuation-only input yields an empty vector.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ingredient_scanner::normalizer::Normalizer;
    ///
    /// let tokens = Normalizer::new().normalize("Contains: MILK, Soy-Lecithin.");
    /// let words: Vec<&str> = tokens.iter().map(|t| t.normalized.as_str()).collect();
    /// assert_eq!(words, vec!["contains", "milk", "soy", "lecithin"]);
    /// assert_eq!(tokens[1].surface, "MILK");
    /// ```
    pub fn normalize(&self, text: &str) -> Vec<Token> {
        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let mut tokens = Vec::new();

        for (run_start, run_end) in runs(&chars) {
            let Some((start, end)) = trim_range(&chars, run_start, run_end) else {
                continue;
            };

            let has_dash = chars[start..end].iter().any(|&(_, c)| is_dash(c));
            if !has_dash || self.is_compound(text, &chars, start, end) {
                self.push_token(text, &chars, start, end, &mut tokens);
                continue;
            }

            // Hyphens act as separators inside this run
            let mut pieces = Vec::new();
            let mut piece_start = start;
            for i in start..=end {
                if i == end || is_dash(chars[i].1) {
                    pieces.extend(trim_range(&chars, piece_start, i));
                    piece_start = i + 1;
                }
            }
            self.push_pieces(text, &chars, &pieces, &mut tokens);
        }

        trace!(token_count = tokens.len(), "Normalized text");
        tokens
    }

    fn is_compound(&self, text: &str, chars: &[(usize, char)], start: usize, end: usize) -> bool {
        !self.compounds.is_empty() && self.compounds.contains(&fold(slice(text, chars, start, end)))
    }

    /// Emit dash-separated pieces, re-joining the longest runs of adjacent
    /// pieces that form a known compound (`gluten-free` in `gluten-free-oats`)
    fn push_pieces(
        &self,
        text: &str,
        chars: &[(usize, char)],
        pieces: &[(usize, usize)],
        tokens: &mut Vec<Token>,
    ) {
        let mut i = 0;
        while i < pieces.len() {
            let next = (i + 2..=pieces.len())
                .rev()
                .find(|&j| self.is_compound(text, chars, pieces[i].0, pieces[j - 1].1))
                .unwrap_or(i + 1);
            self.push_token(text, chars, pieces[i].0, pieces[next - 1].1, tokens);
            i = next;
        }
    }

    fn push_token(
        &self,
        text: &str,
        chars: &[(usize, char)],
        start: usize,
        end: usize,
        tokens: &mut Vec<Token>,
    ) {
        let surface = slice(text, chars, start, end);
        tokens.push(Token {
            index: tokens.len(),
            normalized: fold(surface),
            surface: surface.to_string(),
            start: chars[start].0,
            end: byte_end(text, chars, end),
            char_start: start,
            char_end: end,
        });
    }
}

fn byte_end(text: &str, chars: &[(usize, char)], end: usize) -> usize {
    chars.get(end).map_or(text.len(), |&(byte, _)| byte)
}

fn slice<'a>(text: &'a str, chars: &[(usize, char)], start: usize, end: usize) -> &'a str {
    &text[chars[start].0..byte_end(text, chars, end)]
}

/// Tokenize text with a default [`Normalizer`]
pub fn normalize(text: &str) -> Vec<Token> {
    Normalizer::new().normalize(text)
}
