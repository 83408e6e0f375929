// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The edit-distance kernel behind the short scoring path.
//!
//! This is a two-row Levenshtein variant with one twist: the first DP row is
//! all zeros and the result takes the minimum over the final row. Zeros up
//! front mean the query may start matching anywhere in the source; the final
//! minimum means it may stop anywhere. The net effect is the edit distance
//! between the query and the best-matching *substring* of the source, which
//! is what autocomplete wants — "APP" against "PINEAPPLE" is a hit, not three
//! deletions and a suffix.
//!
//! The reported value is a match count: `len(query) − min(final row)`, in
//! `[0, len(query)]`. Divide by the query length for a similarity ratio.
//!
//! Scratch rows are owned by the caller so a scan over thousands of terms
//! allocates twice, not twice per term.

/// Reusable DP rows. One per scoring shard; never shared across threads.
#[derive(Debug, Default)]
pub struct Scratch {
    row1: Vec<usize>,
    row2: Vec<usize>,
}

impl Scratch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size for sources up to `max_source_len` characters, so the scan
    /// itself never grows the rows.
    pub fn with_capacity(max_source_len: usize) -> Self {
        let mut scratch = Self::default();
        scratch.ensure(max_source_len + 1);
        scratch
    }

    #[inline]
    fn ensure(&mut self, len: usize) {
        if self.row1.len() < len {
            self.row1.resize(len, 0);
            self.row2.resize(len, 0);
        }
    }
}

/// How many query characters survive the best alignment against `source`.
///
/// - Single-character query: 1 if the character occurs anywhere in the
///   source, else 0.
/// - Otherwise: `len(query) − d`, where `d` is the substring edit distance
///   computed by the two-row DP. Unit cost for substitution, insertion, and
///   deletion.
pub fn match_count(query: &[char], source: &[char], scratch: &mut Scratch) -> usize {
    if query.is_empty() {
        return 0;
    }
    if query.len() == 1 {
        return usize::from(source.contains(&query[0]));
    }

    let source_len = source.len();
    scratch.ensure(source_len + 1);
    let row1 = &mut scratch.row1;
    let row2 = &mut scratch.row2;

    // All-zero first row: matching may start at any source position.
    row1[..=source_len].fill(0);

    for (q, &qc) in query.iter().enumerate() {
        row2[0] = q + 1;
        for (s, &sc) in source.iter().enumerate() {
            let cost = usize::from(qc != sc);
            row2[s + 1] = (row1[s + 1] + 1).min(row2[s] + 1).min(row1[s] + cost);
        }
        std::mem::swap(row1, row2);
    }

    // Minimum over the final row: matching may end at any source position.
    let mismatch = row1[..=source_len].iter().copied().min().unwrap_or(0);
    query.len() - mismatch
}

/// Similarity ratio in [0, 1]: `match_count / len(query)`, clipped.
pub fn similarity(query: &[char], source: &[char], scratch: &mut Scratch) -> f32 {
    if query.is_empty() {
        return 0.0;
    }
    let ratio = match_count(query, source, scratch) as f32 / query.len() as f32;
    ratio.clamp(0.0, 1.0)
}
