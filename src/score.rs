// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The two scoring paths and the fuser that reconciles them.
//!
//! Short path: edit-distance similarity across the short set, sharded over
//! the rayon pool. One shard per hardware thread, one scratch pair per shard
//! — never one task per term, the coordination overhead would dwarf the
//! scoring work. When the query has at most one gram window the gram index
//! can't discriminate, so the scan widens to the long set as well.
//!
//! Long path: probe the gram index with each query window and count hits per
//! term. `count / window_count` is the raw overlap score. Repeated query
//! windows are kept and probe again, deliberately: a repeated motif counts
//! double for the terms that carry it and dilutes the terms that don't.
//!
//! The fuser maps per-term raw scores to per-display-key entry scores:
//! threshold on the raw score, multiply by the pair weight, merge per the
//! configured strategy, and finally promote exact matches to the sentinel
//! 100.0 so nothing outranks them.

use ahash::{AHashMap, AHashSet};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::grams::gram_keys;
use crate::index::Index;
use crate::levenshtein::{similarity, Scratch};
use crate::normalize::normalize;
use crate::types::{MergeStrategy, TermId};

/// Raw per-search-term scores from one path. Ids are unique within one
/// path's output.
pub(crate) type RawScores = Vec<(TermId, f32)>;

/// Edit-distance scan. Covers the short set always, and the long set too
/// when the query is too short for the gram index to be reliable.
pub(crate) fn score_short_path(index: &Index, query: &[char]) -> RawScores {
    let mut scores = scan_terms(index, query, &index.short_terms);
    if query.len() <= index.config.gram_size {
        scores.extend(scan_terms(index, query, &index.long_terms));
    }
    scores
}

fn score_one(index: &Index, query: &[char], term: TermId, scratch: &mut Scratch) -> (TermId, f32) {
    let source: Vec<char> = index.pool.get(term).chars().collect();
    (term, similarity(query, &source, scratch))
}

#[cfg(feature = "parallel")]
fn scan_terms(index: &Index, query: &[char], terms: &[TermId]) -> RawScores {
    if terms.is_empty() {
        return Vec::new();
    }
    let shard = terms.len().div_ceil(rayon::current_num_threads().max(1)).max(1);

    // MAP: one bounded task per shard, each with its own scratch rows.
    let per_shard: Vec<RawScores> = terms
        .par_chunks(shard)
        .map(|chunk| {
            let mut scratch = Scratch::with_capacity(index.longest());
            chunk
                .iter()
                .map(|&term| score_one(index, query, term, &mut scratch))
                .collect()
        })
        .collect();

    // REDUCE: shards cover disjoint ids, so concatenation is the merge.
    per_shard.into_iter().flatten().collect()
}

/// Sequential twin for builds without the `parallel` feature.
#[cfg(not(feature = "parallel"))]
fn scan_terms(index: &Index, query: &[char], terms: &[TermId]) -> RawScores {
    let mut scratch = Scratch::with_capacity(index.longest());
    terms
        .iter()
        .map(|&term| score_one(index, query, term, &mut scratch))
        .collect()
}

/// Gram-overlap scan over the long set. Empty when the query has no full
/// window.
pub(crate) fn score_long_path(index: &Index, query: &[char]) -> RawScores {
    if query.len() < index.config.gram_size {
        return Vec::new();
    }
    let keys = gram_keys(query, index.config.gram_size);
    if keys.is_empty() {
        return Vec::new();
    }

    let mut counts: AHashMap<TermId, u32> = AHashMap::new();
    for &key in &keys {
        if let Some(posted) = index.grams.get(key) {
            for &term in posted {
                *counts.entry(term).or_insert(0) += 1;
            }
        }
    }

    let window_count = keys.len() as f32;
    counts
        .into_iter()
        .map(|(term, count)| (term, count as f32 / window_count))
        .collect()
}

/// Fold one path's raw scores into the per-display-key entry scores.
///
/// The threshold compares against the raw per-term score, before weighting —
/// a heavily down-weighted alias still has to clear the same similarity bar
/// as everything else.
///
/// Exact-match promotion: a raw score above 0.999 alone only proves the
/// query aligned perfectly against a *substring*, so it is backed by a
/// string comparison — the search term itself, or the display key re-run
/// through the full normalization, must equal the normalized query. Matching
/// display keys are collected into `promoted`; the caller pins them to 100.0
/// after both paths have fused so the sentinel survives either merge
/// strategy.
pub(crate) fn fuse_into(
    index: &Index,
    entry_scores: &mut AHashMap<TermId, f32>,
    promoted: &mut AHashSet<TermId>,
    raw_scores: &[(TermId, f32)],
    normalized_query: &str,
    threshold: f32,
) {
    for &(term, raw) in raw_scores {
        if raw < threshold {
            continue;
        }
        let exactish = raw > 0.999;
        let term_is_query = exactish && index.pool.get(term) == normalized_query;
        for &(display, weight) in index.targets_of(term) {
            let weighted = weight * raw;
            match index.config.merge {
                MergeStrategy::Max => {
                    entry_scores
                        .entry(display)
                        .and_modify(|score| *score = score.max(weighted))
                        .or_insert(weighted);
                }
                MergeStrategy::Sum => {
                    *entry_scores.entry(display).or_insert(0.0) += weighted;
                }
            }
            if exactish
                && !promoted.contains(&display)
                && (term_is_query
                    || normalize(index.pool.get(display), &index.config) == normalized_query)
            {
                promoted.insert(display);
            }
        }
    }
}

/// Wildcard scoring: list every display key that is its own search term,
/// scored by its self-weight. No similarity is computed at all.
pub(crate) fn wildcard_scores(index: &Index) -> AHashMap<TermId, f32> {
    let mut entry_scores = AHashMap::new();
    for (id, _) in index.pool.iter() {
        if let Some(weight) = index.self_weight(id) {
            entry_scores.insert(id, weight);
        }
    }
    entry_scores
}
