//! # Lexical Analyzer
//!
//! Per-word statistics for the detail view.
//!
//! ## Counting Policy
//!
//! - `length` counts every character (Unicode scalar value) of the word
//! - vowels are `a e i o u`, case-insensitive
//! - consonants are the remaining *alphabetic* characters, so `y` and accented
//!   letters such as `é` count as consonants
//! - digits, punctuation and spaces count as neither and are reported in
//!   `other_count`
//!
//! Hence `vowel_count + consonant_count + other_count == length`, and
//! `consonant_count == length - vowel_count` only for purely alphabetic words.

use crate::normalizer::Token;
use serde::{Deserialize, Serialize};

const VOWELS: [char; 5] = ['a', 'e', 'i', 'o', 'u'];

/// One character of the breakdown, with its 1-based position in the word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharInfo {
    /// The character
    pub ch: char,
    /// 1-based position within the word
    pub index: usize,
}

/// Statistics shown for a selected word
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordStats {
    /// Number of characters
    pub length: usize,
    /// Number of vowels
    pub vowel_count: usize,
    /// Number of alphabetic non-vowels
    pub consonant_count: usize,
    /// Number of non-alphabetic characters
    pub other_count: usize,
    /// Position of the word, as given by the caller
    pub position: usize,
    /// Total number of words, as given by the caller
    pub total_words: usize,
    /// Character-by-character breakdown
    pub characters: Vec<CharInfo>,
}

fn is_vowel(c: char) -> bool {
    VOWELS.contains(&c.to_ascii_lowercase())
}

/// Compute statistics for `word`
///
/// # Examples
///
/// ```rust
/// use ingredient_scanner::lexical::analyze;
///
/// let stats = analyze("apple", 3, 10);
/// assert_eq!(stats.length, 5);
/// assert_eq!(stats.vowel_count, 2);
/// assert_eq!(stats.consonant_count, 3);
/// assert_eq!((stats.position, stats.total_words), (3, 10));
/// ```
pub fn analyze(word: &str, position: usize, total_words: usize) -> WordStats {
    let mut length = 0;
    let mut vowel_count = 0;
    let mut consonant_count = 0;
    let mut characters = Vec::with_capacity(word.len());

    for (i, ch) in word.chars().enumerate() {
        length += 1;
        if is_vowel(ch) {
            vowel_count += 1;
        } else if ch.is_alphabetic() {
            consonant_count += 1;
        }
        characters.push(CharInfo { ch, index: i + 1 });
    }

    WordStats {
        length,
        vowel_count,
        consonant_count,
        other_count: length - vowel_count - consonant_count,
        position,
        total_words,
        characters,
    }
}

/// Statistics for the token at `index`, positioned 1-based within `tokens`
///
/// Uses the token's surface form. Returns `None` when `index` is out of bounds.
pub fn analyze_token(tokens: &[Token], index: usize) -> Option<WordStats> {
    tokens
        .get(index)
        .map(|token| analyze(&token.surface, index + 1, tokens.len()))
}
