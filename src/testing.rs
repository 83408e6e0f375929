//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! It provides canonical implementations of test helpers to avoid duplication.

#![doc(hidden)]

use crate::build::IndexBuilder;
use crate::index::Index;
use crate::types::IndexConfig;

/// Build an index over bare display keys with default weights and config.
pub fn index_of(displays: &[&str]) -> Index {
    index_of_with(displays, IndexConfig::default())
}

/// Build an index over bare display keys with a custom config.
pub fn index_of_with(displays: &[&str], config: IndexConfig) -> Index {
    let mut builder = IndexBuilder::new(config);
    for display in displays {
        builder.push(display, &[]);
    }
    builder.build()
}

/// Build an index from (display, weight) rows, aliases empty.
pub fn weighted_index_of(rows: &[(&str, f32)]) -> Index {
    let mut builder = IndexBuilder::new(IndexConfig::default());
    for &(display, weight) in rows {
        builder.push_weighted(display, weight, &[]);
    }
    builder.build()
}

/// The ranked keys of a search, cloned out for easy assertions.
pub fn keys_for(index: &Index, query: &str, limit: usize) -> Vec<String> {
    index
        .search(query, 0.0, limit)
        .into_iter()
        .map(|hit| hit.key.to_string())
        .collect()
}
