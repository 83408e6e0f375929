// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The building blocks of a ranking index.
//!
//! Everything downstream of the string pool is keyed by [`TermId`], a dense
//! integer handle into the pool. Keying by id instead of by string (or worse,
//! by pointer into a growing vector) is what makes the secondary tables plain
//! arrays and the index trivially shareable across query threads.
//!
//! # Invariants (the stuff that breaks if you ignore it)
//!
//! - **TermId**: `id < pool.len()`. Ids are dense, gap-free, and stable for
//!   the lifetime of the index they belong to.
//! - **SearchHit**: `key` borrows from the pool. Valid exactly as long as the
//!   index is alive, which is fine because the index never mutates after
//!   build.
//! - **Score range**: hit scores live in [0, 1] except for the exact-match
//!   sentinel `100.0`, and may exceed 1 when a query gram repeats or a weight
//!   is above 1. Callers that assume [0, 1] will be surprised; see
//!   [`SearchHit::score`].

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

// =============================================================================
// NEWTYPES: Type-safe term handles
// =============================================================================

/// Type-safe handle for an interned string.
///
/// Prevents accidentally passing a gram count or a shard offset where a pool
/// index is expected. Use `TermId::new()` for runtime-validated construction,
/// or `.into()` for trusted sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct TermId(pub u32);

impl TermId {
    /// Create a new TermId, validating it's within pool bounds.
    #[inline]
    pub fn new(id: u32, pool_len: usize) -> Option<Self> {
        if (id as usize) < pool_len {
            Some(TermId(id))
        } else {
            None
        }
    }

    /// Get the underlying value.
    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }

    /// Convert to usize for array indexing.
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for TermId {
    fn from(id: u32) -> Self {
        TermId(id)
    }
}

impl From<TermId> for usize {
    fn from(id: TermId) -> Self {
        id.0 as usize
    }
}

// =============================================================================
// RESULTS
// =============================================================================

/// One ranked result: a display key and its fused score.
///
/// The key borrows from the index's string pool, so results are zero-copy and
/// live as long as the index does. Clone the strings out if you need to
/// outlive it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SearchHit<'a> {
    /// The display key, exactly as it appeared in the input row (trimmed).
    pub key: &'a str,
    /// Fused similarity score. Normally in [0, 1]; an exact match between the
    /// normalized query and the normalized key is promoted to `100.0` so it
    /// always ranks first. Weights above 1.0 or repeated query grams can also
    /// push a score past 1.
    pub score: f32,
}

// =============================================================================
// CONFIGURATION
// =============================================================================

/// How the fuser combines a new weighted score with an existing entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeStrategy {
    /// Keep the best score seen for a display key. Commutative, so the final
    /// ranking is independent of which scoring path finishes first.
    #[default]
    Max,
    /// Accumulate scores additively. Lets repeated evidence (several aliases,
    /// or both scoring paths) reinforce a key instead of shadowing it.
    Sum,
}

/// The set of characters that survive normalization.
///
/// Anything outside the set is replaced with a space by
/// [`escape_blank`](crate::normalize::escape_blank), which lets a subsequent
/// trim strip boundary noise like `"  foo-bar!  "` down to `"FOO BAR"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ValidChars {
    /// Any Unicode alphanumeric character (plus the space separator that
    /// escaping itself produces). The default.
    Alphanumeric,
    /// An explicit character set. Give it both cases of any letter it allows:
    /// normalization uppercases after escaping, so a set that admits `'a'`
    /// but not `'A'` is not closed under the pipeline and re-normalizing its
    /// output will differ.
    Set(AHashSet<char>),
}

impl ValidChars {
    /// Does `c` survive escaping?
    #[inline]
    pub fn contains(&self, c: char) -> bool {
        match self {
            ValidChars::Alphanumeric => c.is_alphanumeric(),
            ValidChars::Set(set) => set.contains(&c),
        }
    }

    /// Build an explicit set from anything yielding chars.
    pub fn from_chars(chars: impl IntoIterator<Item = char>) -> Self {
        ValidChars::Set(chars.into_iter().collect())
    }
}

impl Default for ValidChars {
    fn default() -> Self {
        ValidChars::Alphanumeric
    }
}

/// Build-time configuration, fixed for the lifetime of an index.
///
/// This replaces mutable process-wide knobs: every index owns its own copy,
/// so two indexes with different gram sizes or character sets coexist without
/// stepping on each other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Gram window length in characters. Must be at least 2; builds with a
    /// smaller value produce a non-indexed instance that answers every query
    /// with no results.
    pub gram_size: usize,
    /// Characters that survive normalization; everything else escapes to a
    /// space.
    pub valid_chars: ValidChars,
    /// How the fuser merges scores per display key.
    pub merge: MergeStrategy,
    /// Strip diacritics before escaping, so "café" and "cafe" normalize to
    /// the same term. Off by default; a no-op unless the crate is built with
    /// the `unicode-normalization` feature.
    pub fold_diacritics: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            gram_size: 3,
            valid_chars: ValidChars::default(),
            merge: MergeStrategy::default(),
            fold_diacritics: false,
        }
    }
}

impl IndexConfig {
    /// Config with a non-default gram window.
    pub fn with_gram_size(gram_size: usize) -> Self {
        Self {
            gram_size,
            ..Self::default()
        }
    }

    /// A search term is long when it has at least two full gram windows.
    /// Long terms are served by the gram index; short ones by edit distance.
    #[inline]
    pub(crate) fn is_long(&self, char_len: usize) -> bool {
        char_len >= 2 * self.gram_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_id_bounds_check() {
        assert_eq!(TermId::new(4, 5), Some(TermId(4)));
        assert_eq!(TermId::new(5, 5), None);
        assert_eq!(TermId(7).as_usize(), 7);
    }

    #[test]
    fn valid_chars_default_is_alphanumeric() {
        let v = ValidChars::default();
        assert!(v.contains('a'));
        assert!(v.contains('Z'));
        assert!(v.contains('9'));
        assert!(v.contains('ü'));
        assert!(!v.contains('-'));
        assert!(!v.contains(' '));
    }

    #[test]
    fn valid_chars_explicit_set() {
        let v = ValidChars::from_chars("abAB12".chars());
        assert!(v.contains('a'));
        assert!(v.contains('B'));
        assert!(!v.contains('c'));
    }

    #[test]
    fn classification_threshold_is_twice_gram_size() {
        let config = IndexConfig::default();
        assert!(!config.is_long(5));
        assert!(config.is_long(6));

        let config = IndexConfig::with_gram_size(2);
        assert!(!config.is_long(3));
        assert!(config.is_long(4));
    }
}
