// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Result ranking: turning the entry-score map into an ordered head slice.
//!
//! Sort order:
//! 1. **Score** - descending, compared with `total_cmp` so the order is total
//!    even though scores are floats
//! 2. **TermId** - ascending, so equal scores always come out in the same
//!    order regardless of hash-map iteration order or which scoring path
//!    finished first
//!
//! Only the head of the list is ever sorted: a partial selection first
//! partitions the top `limit` entries, then sorts just those. For the common
//! autocomplete case (limit ≈ 10 over thousands of candidates) that is the
//! difference between O(n log n) and O(n + k log k).

use std::cmp::Ordering;

use crate::types::TermId;

/// Compare two scored entries for ranking. Higher score first; ties resolve
/// to the smaller id.
#[inline]
pub(crate) fn compare_entries(a: &(TermId, f32), b: &(TermId, f32)) -> Ordering {
    b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0))
}

/// Keep and sort only the best `limit` entries. A limit at or above the
/// input length degrades to a full sort.
pub(crate) fn select_top(mut entries: Vec<(TermId, f32)>, limit: usize) -> Vec<(TermId, f32)> {
    if limit == 0 {
        return Vec::new();
    }
    if limit < entries.len() {
        entries.select_nth_unstable_by(limit - 1, compare_entries);
        entries.truncate(limit);
    }
    entries.sort_unstable_by(compare_entries);
    entries
}
