//! Validation module for group configuration input
//!
//! This module consolidates the checks applied before anything enters the
//! group store:
//!
//! - Group names
//! - Ingredient phrases
//! - Comma-separated word lists typed into the settings screen

use crate::normalizer::normalize_phrase;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref CONTROL_CHARS: Regex =
        Regex::new(r"\p{Cc}").expect("Invalid control character regex pattern");
}

/// Validates a group name input
///
/// # Returns
/// * `Ok(&str)` - The trimmed group name if valid
/// * `Err(&str)` - Error type: "empty", "too_long" or "invalid_characters"
///
/// # Examples
/// ```
/// use ingredient_scanner::validation::validate_group_name;
///
/// assert_eq!(validate_group_name("  Allergens ", 100), Ok("Allergens"));
/// assert_eq!(validate_group_name("   ", 100), Err("empty"));
/// assert_eq!(validate_group_name(&"a".repeat(101), 100), Err("too_long"));
/// ```
pub fn validate_group_name(name: &str, max_chars: usize) -> Result<&str, &'static str> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err("empty");
    }

    if trimmed.chars().count() > max_chars {
        return Err("too_long");
    }

    if CONTROL_CHARS.is_match(trimmed) {
        return Err("invalid_characters");
    }

    Ok(trimmed)
}

/// Validates an ingredient phrase and returns its canonical form
///
/// A phrase must contain at least one alphanumeric word; "  ,  " is as empty
/// as "".
///
/// # Examples
/// ```
/// use ingredient_scanner::validation::validate_phrase;
///
/// assert_eq!(validate_phrase(" Sodium  Nitrite ", 100), Ok("sodium nitrite".to_string()));
/// assert_eq!(validate_phrase(" - ", 100), Err("empty"));
/// ```
pub fn validate_phrase(phrase: &str, max_chars: usize) -> Result<String, &'static str> {
    let canonical = normalize_phrase(phrase);

    if canonical.is_empty() {
        return Err("empty");
    }

    if canonical.chars().count() > max_chars {
        return Err("too_long");
    }

    if CONTROL_CHARS.is_match(&canonical) {
        return Err("invalid_characters");
    }

    Ok(canonical)
}

/// Split a comma-separated word list, dropping empty items
///
/// # Examples
/// ```
/// use ingredient_scanner::validation::parse_word_list;
///
/// assert_eq!(parse_word_list("gelatin, , carmine ,"), vec!["gelatin", "carmine"]);
/// ```
pub fn parse_word_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

/// Human-readable description of a validation error code
pub fn describe(code: &str) -> &'static str {
    match code {
        "empty" => "must contain at least one word",
        "too_long" => "is too long",
        "invalid_characters" => "contains control characters",
        _ => "is invalid",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_name_control_characters() {
        assert_eq!(
            validate_group_name("Bad\u{7}Name", 100),
            Err("invalid_characters")
        );
    }

    #[test]
    fn test_group_name_length_counts_chars() {
        // 100 two-byte characters are still 100 characters
        let name = "é".repeat(100);
        assert!(validate_group_name(&name, 100).is_ok());
    }

    #[test]
    fn test_phrase_whitespace_collapsed() {
        assert_eq!(
            validate_phrase("High\tFructose\n Corn   Syrup", 100),
            Ok("high fructose corn syrup".to_string())
        );
    }

    #[test]
    fn test_phrase_rejections() {
        assert_eq!(validate_phrase("", 100), Err("empty"));
        assert_eq!(validate_phrase("!!!", 100), Err("empty"));
        assert_eq!(validate_phrase(&"x".repeat(11), 10), Err("too_long"));
    }

    #[test]
    fn test_parse_word_list_empty_input() {
        assert!(parse_word_list("").is_empty());
        assert!(parse_word_list(" , ,").is_empty());
    }

    #[test]
    fn test_describe_codes() {
        assert_eq!(describe("empty"), "must contain at least one word");
        assert_eq!(describe("unknown"), "is invalid");
    }
}
