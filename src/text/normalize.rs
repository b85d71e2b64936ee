// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Deterministic text normalization
//!
//! Converts spoken/recognized quantity phrases into canonical short forms so
//! the downstream parser sees "2 kg" instead of "two kilograms". The rule
//! table is fixed at compile time and applied in order, each rule replacing
//! every literal occurrence of its pattern in the previous rule's output.
//!
//! The substitutions are plain substring replacements, not whole-word: short
//! patterns such as "a" fire inside unrelated words, and a rule can consume
//! text a later rule would otherwise have matched ("dozen" runs before
//! "half dozen" ever sees the input). Clients of this service depend on the
//! exact output, artifacts included, so the table and its order are contract.

/// Ordered substitution table: number words to digits, unit words to
/// abbreviations. Order is significant.
pub const REPLACEMENTS: &[(&str, &str)] = &[
    ("two", "2"),
    ("three", "3"),
    ("four", "4"),
    ("five", "5"),
    ("six", "6"),
    ("seven", "7"),
    ("eight", "8"),
    ("nine", "9"),
    ("ten", "10"),
    ("one", "1"),
    ("a", "1"),
    ("an", "1"),
    ("dozen", "12"),
    ("half dozen", "6"),
    ("litre", "ltr"),
    ("liter", "ltr"),
    ("litres", "ltr"),
    ("liters", "ltr"),
    ("gram", "g"),
    ("grams", "g"),
    ("kilogram", "kg"),
    ("kilograms", "kg"),
    ("millilitre", "ml"),
    ("milliliter", "ml"),
    ("millilitres", "ml"),
    ("milliliters", "ml"),
];

/// Output of [`normalize`]
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedText {
    /// The whitespace-collapsed, substituted text
    pub cleaned: String,
    /// Every pattern in the configured table, in application order
    pub patterns: Vec<&'static str>,
}

/// Collapse all whitespace runs to single spaces and trim the ends
///
/// Idempotent: applying it twice yields the same string.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize a text payload: collapse whitespace, then apply the
/// substitution table in order.
///
/// The returned `patterns` list is the audit trail of which rules are
/// configured, not which ones matched this input.
pub fn normalize(text: &str) -> NormalizedText {
    let mut cleaned = collapse_whitespace(text);

    for (pattern, replacement) in REPLACEMENTS {
        cleaned = cleaned.replace(pattern, replacement);
    }

    NormalizedText {
        cleaned,
        patterns: REPLACEMENTS.iter().map(|(pattern, _)| *pattern).collect(),
    }
}
