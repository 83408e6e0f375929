//! Hybrid n-gram + edit-distance ranking for typo-tolerant autocomplete.
//!
//! Feed the builder rows of `(display key, aliases…, weights…)`; ask the
//! index for the display keys closest to a query. Typos, abbreviations, and
//! alternate spellings all land on the intended key because two scoring
//! paths cover each other's blind spots.
//!
//! # Architecture
//!
//! ```text
//!              build                              query
//! ┌──────────────────────────────┐   ┌──────────────────────────────┐
//! │ rows ─▶ normalize ─▶ pool    │   │ normalize                    │
//! │           │      (TermId)    │   │    ├─▶ short path (edit dist)│
//! │           ├─▶ alias targets  │   │    └─▶ long path  (grams)    │
//! │           ├─▶ short/long set │   │            │                 │
//! │           └─▶ gram postings  │   │  fuse ─▶ weights ─▶ top-K    │
//! └──────────────────────────────┘   └──────────────────────────────┘
//! ```
//!
//! Search terms shorter than two gram windows are scored by a substring
//! variant of Levenshtein, sharded across the rayon pool. Longer terms are
//! served by an n-gram inverted index. The fuser reconciles both into
//! per-display-key scores, applies per-pair weights, and promotes exact
//! matches to a sentinel score of 100 so they always rank first.
//!
//! # Usage
//!
//! ```
//! use fuzzydex::{IndexBuilder, IndexConfig};
//!
//! let mut builder = IndexBuilder::new(IndexConfig::default());
//! builder.push("International Business Machines", &["IBM"]);
//! builder.push("Internet Explorer", &[]);
//! let index = builder.build();
//!
//! let hits = index.search("ibm", 0.0, 5);
//! assert_eq!(hits[0].key, "International Business Machines");
//! ```
//!
//! The index is immutable after build; share it by reference from as many
//! threads as you like. There is no persistence and no incremental update —
//! rebuild when the dictionary changes.

// Module declarations
mod build;
mod grams;
mod index;
mod levenshtein;
mod normalize;
mod pool;
mod rank;
mod score;
mod search;
pub mod testing;
mod types;

// Re-exports for public API
pub use build::IndexBuilder;
pub use index::Index;
pub use levenshtein::{match_count, similarity, Scratch};
pub use normalize::{escape_blank, fold_diacritics, normalize};
pub use types::{IndexConfig, MergeStrategy, SearchHit, TermId, ValidChars};
