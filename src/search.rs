// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query orchestration: one query in, a ranked head slice out.
//!
//! The flow per query:
//!
//! ```text
//! query ──▶ wildcard? ──▶ self-weight listing ─────────────┐
//!    │                                                     ▼
//!    └──▶ normalize ──▶ join(short path, long path) ──▶ fuse ──▶ top-K
//! ```
//!
//! The two scoring paths run under `rayon::join`; the fuser's default
//! max-merge is commutative, so which path lands first is unobservable. A
//! query never fails: a non-indexed instance, a query that normalizes to
//! nothing, or a threshold nothing clears all produce an empty vec.

use ahash::AHashSet;

use crate::index::Index;
use crate::normalize::normalize;
use crate::rank::select_top;
use crate::score::{fuse_into, score_long_path, score_short_path, wildcard_scores};
use crate::types::SearchHit;

impl Index {
    /// Rank display keys against `query`.
    ///
    /// `threshold` filters on the raw per-term similarity, before weights are
    /// applied. `limit` caps the number of results; 0 means unlimited. The
    /// empty query and `"*"` are the wildcard: every self-mapping display
    /// key, scored by its own weight.
    ///
    /// Returned keys borrow from the index; scores are in [0, 1] plus the
    /// 100.0 exact-match sentinel (see [`SearchHit::score`]).
    pub fn search(&self, query: &str, threshold: f32, limit: usize) -> Vec<SearchHit<'_>> {
        if !self.indexed {
            return Vec::new();
        }
        let limit = if limit == 0 { usize::MAX } else { limit };

        let entry_scores = if query.is_empty() || query == "*" {
            wildcard_scores(self)
        } else {
            let normalized = normalize(query, &self.config);
            if normalized.is_empty() {
                return Vec::new();
            }
            let query_chars: Vec<char> = normalized.chars().collect();

            let (short_scores, long_scores) = join(
                || score_short_path(self, &query_chars),
                || score_long_path(self, &query_chars),
            );

            let mut entry_scores = ahash::AHashMap::new();
            let mut promoted = AHashSet::new();
            fuse_into(
                self,
                &mut entry_scores,
                &mut promoted,
                &short_scores,
                &normalized,
                threshold,
            );
            fuse_into(
                self,
                &mut entry_scores,
                &mut promoted,
                &long_scores,
                &normalized,
                threshold,
            );
            // Exact matches outrank everything, whatever the merge strategy
            // did to their entry meanwhile.
            for id in promoted {
                entry_scores.insert(id, 100.0);
            }
            entry_scores
        };

        let ranked = select_top(entry_scores.into_iter().collect(), limit);
        ranked
            .into_iter()
            .map(|(id, score)| SearchHit {
                key: self.pool.get(id),
                score,
            })
            .collect()
    }
}

#[cfg(feature = "parallel")]
#[inline]
fn join<A, B, RA, RB>(a: A, b: B) -> (RA, RB)
where
    A: FnOnce() -> RA + Send,
    B: FnOnce() -> RB + Send,
    RA: Send,
    RB: Send,
{
    rayon::join(a, b)
}

#[cfg(not(feature = "parallel"))]
#[inline]
fn join<A, B, RA, RB>(a: A, b: B) -> (RA, RB)
where
    A: FnOnce() -> RA,
    B: FnOnce() -> RB,
{
    (a(), b())
}
