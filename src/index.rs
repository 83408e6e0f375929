//! The immutable index: everything a query needs, nothing a query can change.
//!
//! An [`Index`] is produced once by [`IndexBuilder::build`](crate::IndexBuilder::build)
//! and never mutated afterwards. Concurrent queries share it by `&Index`; the
//! only per-query mutable state lives on the query's own stack (scratch rows
//! and score maps), so no locking exists anywhere in the crate.
//!
//! # Layout
//!
//! | Table | Keyed by | Holds |
//! |-------|----------|-------|
//! | `pool` | `TermId` | every interned string |
//! | `targets` | search-term id | `(display id, weight)` pairs |
//! | `short_terms` / `long_terms` | — | the classification of search terms |
//! | `grams` | gram hash | posting lists over long terms |
//!
//! `targets` has one slot per pool entry; display-only strings simply have an
//! empty slot. That wastes a few empty vecs to keep lookup a plain array
//! index instead of a hash probe on the hottest query path.

use crate::grams::NgramIndex;
use crate::pool::StringPool;
use crate::types::{IndexConfig, TermId};

/// An immutable, queryable ranking index. See the module docs for layout.
#[derive(Debug, Clone)]
pub struct Index {
    pub(crate) pool: StringPool,
    /// Per search-term id: the display keys it resolves to, with weights.
    /// Sorted by display id; deduplicated; zero-weight pairs already dropped.
    pub(crate) targets: Vec<Vec<(TermId, f32)>>,
    /// Search terms shorter than two gram windows, in id order.
    pub(crate) short_terms: Vec<TermId>,
    /// Search terms with at least two gram windows, in id order.
    pub(crate) long_terms: Vec<TermId>,
    pub(crate) grams: NgramIndex,
    /// Number of search terms (non-empty `targets` slots).
    pub(crate) entry_count: usize,
    pub(crate) config: IndexConfig,
    /// False for instances produced from rejected builds (gram size < 2,
    /// fewer than two rows). Queries against such an instance return nothing.
    pub(crate) indexed: bool,
}

impl Index {
    /// A non-indexed instance: what a rejected build returns. Every query
    /// against it comes back empty.
    pub fn empty(config: IndexConfig) -> Self {
        Self {
            pool: StringPool::default(),
            targets: Vec::new(),
            short_terms: Vec::new(),
            long_terms: Vec::new(),
            grams: NgramIndex::new(),
            entry_count: 0,
            config,
            indexed: false,
        }
    }

    /// Number of indexed search terms.
    pub fn len(&self) -> usize {
        self.entry_count
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }

    /// Did the build actually index anything? False only for rejected builds;
    /// a successful build over rows that all got skipped is indexed but
    /// empty.
    pub fn is_indexed(&self) -> bool {
        self.indexed
    }

    /// Number of distinct grams in the inverted index.
    pub fn gram_count(&self) -> usize {
        self.grams.gram_count()
    }

    /// Character count of the longest interned string.
    pub fn longest(&self) -> usize {
        self.pool.longest()
    }

    /// The configuration this index was built with.
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// The `(display, weight)` targets of a search term; empty for ids that
    /// are display-only.
    #[inline]
    pub(crate) fn targets_of(&self, id: TermId) -> &[(TermId, f32)] {
        &self.targets[id.as_usize()]
    }

    /// The weight a display key assigns to itself, if it is its own search
    /// term. This is what the wildcard query lists.
    pub(crate) fn self_weight(&self, id: TermId) -> Option<f32> {
        self.targets_of(id)
            .iter()
            .find(|(d, _)| *d == id)
            .map(|&(_, w)| w)
    }
}
