//! The n-gram inverted index over long terms.
//!
//! A gram is a window of exactly `gram_size` consecutive characters. Rather
//! than owning one tiny allocation per window, each gram is keyed by a 64-bit
//! FNV-1a hash over its code points: equal windows always hash equal, and at
//! dictionary scale a collision between distinct windows is vanishingly rare.
//! A collision is also survivable — it only merges two posting lists, which
//! widens the candidate set the scorer sees, never corrupts it.
//!
//! # Invariants
//!
//! 1. Only long terms (length ≥ 2·gram_size) are posted.
//! 2. A term appears at most once per distinct gram, even when the gram
//!    repeats inside the term.
//! 3. Posting lists are in ascending id order (terms are inserted in id
//!    order at build; order is unobservable at query time but keeps builds
//!    reproducible).

use ahash::AHashMap;

use crate::types::TermId;

/// Hashed gram window.
pub(crate) type GramKey = u64;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// FNV-1a over the window's code points.
#[inline]
pub(crate) fn gram_key(window: &[char]) -> GramKey {
    let mut hash = FNV_OFFSET;
    for &c in window {
        hash ^= c as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Keys for every window of `text`, in order, duplicates kept.
///
/// Empty when the text is shorter than one window. The query side relies on
/// duplicates staying in: a repeated motif in the query amplifies the grams
/// it repeats.
pub(crate) fn gram_keys(text: &[char], gram_size: usize) -> Vec<GramKey> {
    if gram_size == 0 || text.len() < gram_size {
        return Vec::new();
    }
    text.windows(gram_size).map(gram_key).collect()
}

/// Gram → posting list of long-term ids.
#[derive(Debug, Clone, Default)]
pub(crate) struct NgramIndex {
    postings: AHashMap<GramKey, Vec<TermId>>,
}

impl NgramIndex {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Post `id` under every distinct gram of `text`.
    pub(crate) fn insert_term(&mut self, id: TermId, text: &[char], gram_size: usize) {
        let mut keys = gram_keys(text, gram_size);
        // A gram repeating inside the term must still yield one membership.
        keys.sort_unstable();
        keys.dedup();
        for key in keys {
            self.postings.entry(key).or_default().push(id);
        }
    }

    /// The ids posted under `key`, if any.
    #[inline]
    pub(crate) fn get(&self, key: GramKey) -> Option<&[TermId]> {
        self.postings.get(&key).map(Vec::as_slice)
    }

    /// Number of distinct grams.
    #[inline]
    pub(crate) fn gram_count(&self) -> usize {
        self.postings.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn gram_keys_slide_one_char_at_a_time() {
        // "ABCD" with g=3 has windows ABC, BCD
        let keys = gram_keys(&chars("ABCD"), 3);
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0], gram_key(&chars("ABC")));
        assert_eq!(keys[1], gram_key(&chars("BCD")));
    }

    #[test]
    fn gram_keys_empty_below_window() {
        assert!(gram_keys(&chars("AB"), 3).is_empty());
        assert!(gram_keys(&chars(""), 3).is_empty());
        // Exactly one window at the boundary
        assert_eq!(gram_keys(&chars("ABC"), 3).len(), 1);
    }

    #[test]
    fn query_side_keeps_duplicates() {
        // "ABABAB": windows ABA, BAB, ABA, BAB
        let keys = gram_keys(&chars("ABABAB"), 3);
        assert_eq!(keys.len(), 4);
        assert_eq!(keys[0], keys[2]);
        assert_eq!(keys[1], keys[3]);
    }

    #[test]
    fn equal_windows_hash_equal_distinct_differ() {
        assert_eq!(gram_key(&chars("ABC")), gram_key(&chars("ABC")));
        assert_ne!(gram_key(&chars("ABC")), gram_key(&chars("ACB")));
        assert_ne!(gram_key(&chars("ABC")), gram_key(&chars("AB")));
    }

    #[test]
    fn insert_term_deduplicates_repeated_grams() {
        let mut index = NgramIndex::new();
        // "ABABAB" repeats both of its distinct grams
        index.insert_term(TermId(0), &chars("ABABAB"), 3);

        let posted = index.get(gram_key(&chars("ABA"))).unwrap();
        assert_eq!(posted, &[TermId(0)]);
        let posted = index.get(gram_key(&chars("BAB"))).unwrap();
        assert_eq!(posted, &[TermId(0)]);
        assert_eq!(index.gram_count(), 2);
    }

    #[test]
    fn every_window_of_a_term_is_posted() {
        let mut index = NgramIndex::new();
        let term = chars("INTERNATIONAL");
        index.insert_term(TermId(3), &term, 3);

        for window in term.windows(3) {
            let posted = index.get(gram_key(window)).expect("missing gram");
            assert!(posted.contains(&TermId(3)));
        }
    }

    #[test]
    fn posting_lists_accumulate_in_id_order() {
        let mut index = NgramIndex::new();
        index.insert_term(TermId(0), &chars("ABCDEF"), 3);
        index.insert_term(TermId(1), &chars("ABCXYZ"), 3);

        let posted = index.get(gram_key(&chars("ABC"))).unwrap();
        assert_eq!(posted, &[TermId(0), TermId(1)]);
    }
}
