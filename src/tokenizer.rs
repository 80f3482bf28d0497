// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Turning free text into the words the index is keyed by.
//!
//! The index and the query side both go through [`extract_words`], so a word
//! that could be indexed is exactly a word that can be asked for. If you ever
//! tokenize one side differently, searches silently stop matching.
//!
//! # Algorithm
//!
//! 1. Fold diacritics (with the `unicode-normalization` feature): "café" → "cafe"
//! 2. Lowercase
//! 3. Replace every character that is neither alphanumeric nor whitespace with a space
//! 4. Split on whitespace
//! 5. Drop words of two characters or fewer ("a", "an", "of", "id")

#[cfg(feature = "unicode-normalization")]
use unicode_normalization::UnicodeNormalization;

/// Words shorter than this never reach the index.
pub const MIN_WORD_LEN: usize = 3;

/// Extract lowercase word tokens from free text.
///
/// Pure and deterministic. Used identically for indexing summaries and
/// descriptions and for splitting queries.
///
/// ```
/// use apiscope::extract_words;
///
/// let words = extract_words("Create a new user-account!");
/// assert_eq!(words, vec!["create", "new", "user", "account"]);
/// ```
pub fn extract_words(text: &str) -> Vec<String> {
    fold(text)
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .filter(|word| word.chars().count() >= MIN_WORD_LEN)
        .map(str::to_string)
        .collect()
}

/// Lowercase, with diacritics stripped.
#[cfg(feature = "unicode-normalization")]
fn fold(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Lowercase only; assumes ASCII or pre-normalized input.
#[cfg(not(feature = "unicode-normalization"))]
fn fold(value: &str) -> String {
    value.to_lowercase()
}

/// Combining marks (Unicode category Mn) left behind by NFD decomposition.
#[cfg(feature = "unicode-normalization")]
fn is_combining_mark(c: char) -> bool {
    matches!(c,
        '\u{0300}'..='\u{036F}' |  // Combining Diacritical Marks
        '\u{1AB0}'..='\u{1AFF}' |  // Combining Diacritical Marks Extended
        '\u{1DC0}'..='\u{1DFF}' |  // Combining Diacritical Marks Supplement
        '\u{20D0}'..='\u{20FF}' |  // Combining Diacritical Marks for Symbols
        '\u{FE20}'..='\u{FE2F}'    // Combining Half Marks
    )
}
