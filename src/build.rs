//! Index construction: rows in, immutable [`Index`] out.
//!
//! The builder accumulates `(search term → display → weight)` associations
//! keyed by interned ids from the start — there is no phase where tables are
//! keyed by strings or by pointers into a growing vector. Ids are assigned in
//! first-appearance order, so identical input always produces an identical
//! index, bit for bit.
//!
//! Build is single-threaded and total: it either returns a working index
//! (possibly with zero entries, when every row was skippable junk) or a
//! non-indexed instance for the two hard rejections — a gram window below 2,
//! or fewer than two rows. Malformed rows are skipped and logged through
//! whatever `tracing` subscriber the host has installed, never surfaced as
//! errors.

use ahash::AHashMap;
use tracing::{debug, trace};

use crate::grams::NgramIndex;
use crate::index::Index;
use crate::normalize::normalize;
use crate::pool::PoolBuilder;
use crate::types::{IndexConfig, TermId};

/// Accumulates rows, then builds the index in one shot.
///
/// ```
/// use fuzzydex::{IndexBuilder, IndexConfig};
///
/// let mut builder = IndexBuilder::new(IndexConfig::default());
/// builder.push("apple", &["aple"]);
/// builder.push("apricot", &[]);
/// let index = builder.build();
/// assert!(index.is_indexed());
/// ```
#[derive(Debug)]
pub struct IndexBuilder {
    config: IndexConfig,
    pool: PoolBuilder,
    /// search-term id → display id → weight. Re-registering a pair overwrites
    /// its weight (last one wins); the map is what deduplicates repeated
    /// rows.
    targets: AHashMap<TermId, AHashMap<TermId, f32>>,
    /// Rows submitted, including ones that were skipped as malformed. The
    /// minimum-row check counts submissions, not survivors.
    rows: usize,
}

impl IndexBuilder {
    pub fn new(config: IndexConfig) -> Self {
        Self {
            config,
            pool: PoolBuilder::new(),
            targets: AHashMap::new(),
            rows: 0,
        }
    }

    /// Add a row with default weights: the display key and each alias all
    /// resolve to `display` with weight 1.0.
    pub fn push(&mut self, display: &str, aliases: &[&str]) {
        self.add_row(display, 1.0, aliases.iter().map(|&a| (a, 1.0)));
    }

    /// Add a row with explicit per-cell weights. A weight of exactly 0.0
    /// drops that (cell, display) pair — the standard way to make a display
    /// key findable only through its aliases, or vice versa.
    pub fn push_weighted(&mut self, display: &str, display_weight: f32, aliases: &[(&str, f32)]) {
        self.add_row(display, display_weight, aliases.iter().copied());
    }

    fn add_row<'a>(
        &mut self,
        display: &str,
        display_weight: f32,
        aliases: impl Iterator<Item = (&'a str, f32)>,
    ) {
        self.rows += 1;

        let trimmed = display.trim();
        if trimmed.is_empty() {
            debug!(row = self.rows, "skipping row: display empty after trim");
            return;
        }

        // The display string is interned lazily: a row whose every cell is
        // zero-weighted or junk leaves no trace in the pool.
        let mut display_id: Option<TermId> = None;

        let upper = normalize(display, &self.config);
        if display_weight != 0.0 && !upper.is_empty() {
            let d = *display_id.get_or_insert_with(|| self.pool.intern(trimmed));
            let s = self.pool.intern(&upper);
            self.targets.entry(s).or_default().insert(d, display_weight);
        } else if display_weight == 0.0 {
            debug!(key = trimmed, "zero weight drops display self-entry");
        }

        for (alias, weight) in aliases {
            let normalized = normalize(alias, &self.config);
            if normalized.is_empty() {
                continue;
            }
            if weight == 0.0 {
                debug!(alias = normalized.as_str(), key = trimmed, "zero weight drops alias");
                continue;
            }
            let d = *display_id.get_or_insert_with(|| self.pool.intern(trimmed));
            let s = self.pool.intern(&normalized);
            self.targets.entry(s).or_default().insert(d, weight);
        }
    }

    /// Build an index from the flat 2-D cell view: every `row_len` cells form
    /// one row, cell 0 the display key and the rest aliases. `weights`, when
    /// given, is parallel to `cells`; missing trailing weights default to
    /// 1.0. Empty cells are the flat view's null entries and are skipped.
    pub fn from_flat(
        cells: &[&str],
        row_len: usize,
        weights: Option<&[f32]>,
        config: IndexConfig,
    ) -> Index {
        if row_len == 0 {
            debug!("build rejected: zero row length");
            return Index::empty(config);
        }
        let weight_at =
            |i: usize| weights.map_or(1.0, |w| w.get(i).copied().unwrap_or(1.0));

        let mut builder = IndexBuilder::new(config);
        for start in (0..cells.len()).step_by(row_len) {
            let end = (start + row_len).min(cells.len());
            let alias_cells = cells[start + 1..end]
                .iter()
                .enumerate()
                .map(|(j, &a)| (a, weight_at(start + 1 + j)));
            builder.add_row(cells[start], weight_at(start), alias_cells);
        }
        builder.build()
    }

    /// Finish: intern everything into the final tables, classify search
    /// terms, and build the gram index over the long set.
    pub fn build(self) -> Index {
        if self.config.gram_size < 2 || self.rows < 2 {
            debug!(
                gram_size = self.config.gram_size,
                rows = self.rows,
                "build rejected, returning non-indexed instance"
            );
            return Index::empty(self.config);
        }

        let pool = self.pool.finish();

        // Freeze the transient maps into one slot per pool entry; sort each
        // slot by display id so the table's content is reproducible.
        let mut targets = vec![Vec::new(); pool.len()];
        for (s, by_display) in self.targets {
            let mut list: Vec<(TermId, f32)> = by_display.into_iter().collect();
            list.sort_unstable_by_key(|&(d, _)| d);
            targets[s.as_usize()] = list;
        }

        let mut short_terms = Vec::new();
        let mut long_terms = Vec::new();
        let mut grams = NgramIndex::new();
        let mut entry_count = 0;

        for (id, text) in pool.iter() {
            if targets[id.as_usize()].is_empty() {
                continue; // display-only entry, not a search term
            }
            entry_count += 1;
            let chars: Vec<char> = text.chars().collect();
            if self.config.is_long(chars.len()) {
                long_terms.push(id);
                grams.insert_term(id, &chars, self.config.gram_size);
            } else {
                short_terms.push(id);
            }
        }

        trace!(
            entries = entry_count,
            short = short_terms.len(),
            long = long_terms.len(),
            grams = grams.gram_count(),
            longest = pool.longest(),
            "index built"
        );

        Index {
            pool,
            targets,
            short_terms,
            long_terms,
            grams,
            entry_count,
            config: self.config,
            indexed: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MergeStrategy;

    fn two_rows() -> IndexBuilder {
        let mut builder = IndexBuilder::new(IndexConfig::default());
        builder.push("apple", &["aple"]);
        builder.push("banana", &[]);
        builder
    }

    #[test]
    fn build_rejects_small_gram_size() {
        let mut builder = IndexBuilder::new(IndexConfig::with_gram_size(1));
        builder.push("apple", &[]);
        builder.push("banana", &[]);
        let index = builder.build();
        assert!(!index.is_indexed());
    }

    #[test]
    fn build_rejects_single_row() {
        let mut builder = IndexBuilder::new(IndexConfig::default());
        builder.push("apple", &[]);
        assert!(!builder.build().is_indexed());
    }

    #[test]
    fn gram_size_two_is_accepted() {
        let mut builder = IndexBuilder::new(IndexConfig::with_gram_size(2));
        builder.push("apple", &[]);
        builder.push("banana", &[]);
        assert!(builder.build().is_indexed());
    }

    #[test]
    fn skipped_rows_still_count_toward_minimum() {
        // Two submissions, both junk: build succeeds with zero entries.
        let mut builder = IndexBuilder::new(IndexConfig::default());
        builder.push("   ", &[]);
        builder.push("", &["alias"]);
        let index = builder.build();
        assert!(index.is_indexed());
        assert!(index.is_empty());
    }

    #[test]
    fn display_and_upper_key_share_id_when_already_normalized() {
        let mut builder = IndexBuilder::new(IndexConfig::default());
        builder.push("APPLE", &[]);
        builder.push("BANANA", &[]);
        let index = builder.build();

        // "APPLE" is its own search term: pool holds one entry per row.
        assert_eq!(index.pool.len(), 2);
        assert_eq!(index.len(), 2);
        let id = index.pool.iter().find(|&(_, s)| s == "APPLE").unwrap().0;
        assert_eq!(index.self_weight(id), Some(1.0));
    }

    #[test]
    fn lowercase_display_gets_separate_search_term() {
        let index = two_rows().build();
        // "apple" + "APPLE" + "APLE" + "banana" + "BANANA"
        assert_eq!(index.pool.len(), 5);
        // Search terms: APPLE, APLE, BANANA
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn classification_respects_double_window_rule() {
        let mut builder = IndexBuilder::new(IndexConfig::default());
        builder.push("CAT", &[]); // 3 chars → short
        builder.push("CATFISH", &[]); // 7 chars → long
        builder.push("CATNIP", &[]); // exactly 6 → long
        let index = builder.build();

        assert_eq!(index.short_terms.len(), 1);
        assert_eq!(index.long_terms.len(), 2);
        // Every gram of every long term is present.
        assert!(index.gram_count() > 0);
    }

    #[test]
    fn zero_weight_drops_the_pair_not_the_row() {
        let mut builder = IndexBuilder::new(IndexConfig::default());
        builder.push_weighted("FOO", 0.0, &[("F", 1.0)]);
        builder.push("BAR", &[]);
        let index = builder.build();

        // FOO is reachable through its alias but not through itself.
        let foo = index.pool.iter().find(|&(_, s)| s == "FOO").unwrap().0;
        assert!(index.targets_of(foo).is_empty());
        let f = index.pool.iter().find(|&(_, s)| s == "F").unwrap().0;
        assert_eq!(index.targets_of(f), &[(foo, 1.0)]);
    }

    #[test]
    fn duplicate_pairs_keep_last_weight() {
        let mut builder = IndexBuilder::new(IndexConfig::default());
        builder.push_weighted("APPLE", 0.5, &[]);
        builder.push_weighted("APPLE", 0.9, &[]);
        let index = builder.build();

        let id = index.pool.iter().find(|&(_, s)| s == "APPLE").unwrap().0;
        assert_eq!(index.self_weight(id), Some(0.9));
    }

    #[test]
    fn shared_alias_resolves_to_every_display() {
        let mut builder = IndexBuilder::new(IndexConfig::default());
        builder.push("Apple Inc", &["AAPL"]);
        builder.push("Apple Farm", &["AAPL"]);
        let index = builder.build();

        let alias = index.pool.iter().find(|&(_, s)| s == "AAPL").unwrap().0;
        assert_eq!(index.targets_of(alias).len(), 2);
    }

    #[test]
    fn from_flat_parses_rows_and_weights() {
        let cells = ["foo", "f", "foobar", ""];
        let weights = [0.1_f32, 1.0, 1.0, 1.0];
        let index = IndexBuilder::from_flat(&cells, 2, Some(&weights), IndexConfig::default());

        assert!(index.is_indexed());
        // Rows: ("foo", alias "f") and ("foobar", empty alias skipped).
        assert_eq!(index.len(), 3); // FOO, F, FOOBAR
        let foo = index.pool.iter().find(|&(_, s)| s == "foo").unwrap().0;
        let upper = index.pool.iter().find(|&(_, s)| s == "FOO").unwrap().0;
        assert_eq!(index.targets_of(upper), &[(foo, 0.1)]);
    }

    #[test]
    fn from_flat_rejects_zero_row_len() {
        let index = IndexBuilder::from_flat(&["a", "b"], 0, None, IndexConfig::default());
        assert!(!index.is_indexed());
    }

    #[test]
    fn config_rides_along() {
        let mut config = IndexConfig::with_gram_size(4);
        config.merge = MergeStrategy::Sum;
        let mut builder = IndexBuilder::new(config);
        builder.push("alpha", &[]);
        builder.push("beta", &[]);
        let index = builder.build();
        assert_eq!(index.config().gram_size, 4);
        assert_eq!(index.config().merge, MergeStrategy::Sum);
    }
}
