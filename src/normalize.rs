//! String normalization: the pipeline every search term and query go through.
//!
//! The pipeline is escape → trim → uppercase. Escaping replaces anything
//! outside the configured [`ValidChars`] set with a space, so a following
//! trim strips boundary punctuation and whitespace in one move:
//! `"  (apple)  "` → `"  apple  "` → `"APPLE"`. Interior separators survive
//! as single spaces, so multi-word keys stay multi-word.
//!
//! The pipeline is idempotent as long as the valid set is closed under
//! uppercasing (the default alphanumeric set is): normalized output contains
//! only valid characters and interior spaces, which a second pass maps to
//! themselves.

#[cfg(feature = "unicode-normalization")]
use unicode_normalization::UnicodeNormalization;

use crate::types::{IndexConfig, ValidChars};

/// Replace every character outside `valid` with a space.
///
/// This is deliberately not a filter: turning junk into spaces instead of
/// deleting it keeps the remaining characters from fusing into an accidental
/// new token (`"foo-bar"` escapes to `"foo bar"`, not `"foobar"`).
pub fn escape_blank(value: &str, valid: &ValidChars) -> String {
    value
        .chars()
        .map(|c| if valid.contains(c) { c } else { ' ' })
        .collect()
}

/// Run the full pipeline: optional diacritic folding, escape, trim, uppercase.
///
/// An input that is all junk normalizes to the empty string; the builder and
/// the query path both treat that as "nothing here".
pub fn normalize(value: &str, config: &IndexConfig) -> String {
    let folded;
    let value = if config.fold_diacritics {
        folded = fold_diacritics(value);
        folded.as_str()
    } else {
        value
    };
    let escaped = escape_blank(value.trim(), &config.valid_chars);
    escaped.trim().to_uppercase()
}

/// Decompose and drop combining marks, so "café" folds to "cafe".
///
/// # Algorithm (with unicode-normalization feature)
///
/// 1. NFD normalize (decompose characters into base + combining marks)
/// 2. Filter out combining marks (category Mn = Mark, Nonspacing)
#[cfg(feature = "unicode-normalization")]
pub fn fold_diacritics(value: &str) -> String {
    value.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Fallback without the unicode-normalization dependency: identity.
#[cfg(not(feature = "unicode-normalization"))]
pub fn fold_diacritics(value: &str) -> String {
    value.to_string()
}

/// Check if a character is a combining mark (diacritic).
///
/// Combining marks have Unicode category "Mn" (Mark, Nonspacing).
/// Examples: ́ (acute), ̄ (macron), ̣ (dot below)
#[cfg(feature = "unicode-normalization")]
fn is_combining_mark(c: char) -> bool {
    // Unicode category Mn (Mark, Nonspacing) range
    // This covers the most common combining diacritical marks
    matches!(c,
        '\u{0300}'..='\u{036F}' |  // Combining Diacritical Marks
        '\u{1DC0}'..='\u{1DFF}' |  // Combining Diacritical Marks Supplement
        '\u{20D0}'..='\u{20FF}' |  // Combining Diacritical Marks for Symbols
        '\u{FE20}'..='\u{FE2F}'    // Combining Half Marks
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IndexConfig;

    #[test]
    fn escape_replaces_invalid_with_space() {
        let config = IndexConfig::default();
        assert_eq!(escape_blank("foo-bar!", &config.valid_chars), "foo bar ");
        assert_eq!(escape_blank("abc", &config.valid_chars), "abc");
    }

    #[test]
    fn normalize_trims_escapes_and_uppercases() {
        let config = IndexConfig::default();
        assert_eq!(normalize("  apple  ", &config), "APPLE");
        assert_eq!(normalize("(apple)", &config), "APPLE");
        assert_eq!(normalize("new york", &config), "NEW YORK");
        assert_eq!(normalize("foo-bar", &config), "FOO BAR");
    }

    #[test]
    fn normalize_rejects_all_junk_to_empty() {
        let config = IndexConfig::default();
        assert_eq!(normalize("!!!", &config), "");
        assert_eq!(normalize("   ", &config), "");
        assert_eq!(normalize("", &config), "");
    }

    #[test]
    fn normalize_is_idempotent_on_default_set() {
        let config = IndexConfig::default();
        for input in ["  Mixed-Case Input!  ", "déjà vu", "a*b*c", "PLAIN"] {
            let once = normalize(input, &config);
            let twice = normalize(&once, &config);
            assert_eq!(once, twice, "normalize not idempotent for {:?}", input);
        }
    }

    #[test]
    fn custom_set_escapes_outside_chars() {
        let mut config = IndexConfig::default();
        config.valid_chars = crate::types::ValidChars::from_chars("abcABC".chars());
        assert_eq!(normalize("abc123", &config), "ABC");
    }

    #[cfg(feature = "unicode-normalization")]
    #[test]
    fn folding_strips_diacritics() {
        assert_eq!(fold_diacritics("café"), "cafe");
        assert_eq!(fold_diacritics("naïve"), "naive");

        let mut config = IndexConfig::default();
        config.fold_diacritics = true;
        assert_eq!(normalize("café", &config), "CAFE");
    }
}
