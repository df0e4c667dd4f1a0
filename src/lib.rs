// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Block-compressed inverted-index search core.
//!
//! Talpa is the storage and query-processing heart of an inverted-index
//! search engine: interchangeable integer block codecs, a block posting-list
//! format with per-block maxima and lazy cursors, WAND auxiliary score
//! bounds, a family of scorers, and nine top-k query processors from
//! exhaustive OR to BlockMax-WAND.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────┐   ┌──────────┐   ┌───────────────┐
//! │ codec    │──▶│ postings  │──▶│ index    │──▶│ cursor        │
//! │ (blocks) │   │ (lists)   │   │ (EF dir) │   │ (+ scorer)    │
//! └──────────┘   └───────────┘   └──────────┘   └───────┬───────┘
//!                                     ▲                 │
//! ┌──────────┐   ┌───────────┐        │         ┌───────▼───────┐
//! │ scoring  │──▶│ wand      │────────┘         │ query::       │
//! │ (BM25…)  │   │ (bounds)  │                  │ algorithm     │
//! └──────────┘   └───────────┘                  │ (WAND, BMW…)  │
//!                                               └───────┬───────┘
//!                ┌───────────┐   ┌──────────┐   ┌───────▼───────┐
//!                │accumulator│──▶│ topk     │◀──│ results       │
//!                └───────────┘   └──────────┘   └───────────────┘
//! ```
//!
//! Everything out of scope here (tokenisation, lexica, forward-index
//! inversion, document reordering) happens upstream; this crate takes term
//! ids and posting lists and gives back ranked docids.
//!
//! # Usage
//!
//! ```ignore
//! use talpa::{InvertedIndexBuilder, WandData, BlockPartition, ScorerParams};
//! use talpa::{make_block_max_scored_cursors, BlockMaxWandQuery, Query, TermPolicy};
//!
//! let mut builder = InvertedIndexBuilder::new("block_simdbp", num_docs)?;
//! for (docs, freqs) in lists {
//!     builder.add_posting_list(&docs, &freqs)?;
//! }
//! let index = builder.build()?;
//! let wdata = WandData::build(&index, doc_lens, &ScorerParams::default(),
//!                             BlockPartition::Fixed(64), None)?;
//!
//! let scorer = talpa::scoring::from_params(&ScorerParams::default(), &wdata)?;
//! let query = Query::parse("q1:3 17 21", TermPolicy::DEFAULT)?;
//! let mut cursors = make_block_max_scored_cursors(&index, &wdata, scorer.as_ref(), &query)?;
//! let mut processor = BlockMaxWandQuery::new(10);
//! processor.run(&mut cursors, index.num_docs());
//! ```

// Module declarations
pub mod accumulator;
pub mod bits;
pub mod codec;
pub mod cursor;
pub mod ef;
pub mod error;
pub mod index;
pub mod postings;
pub mod query;
pub mod scoring;
pub mod topk;
pub mod wand;

// Re-exports for public API
pub use accumulator::{Accumulator, LazyAccumulator, SimpleAccumulator};
pub use codec::{block_codec_names, get_block_codec, BlockCodec, BLOCK_SIZE};
pub use cursor::{
    make_block_max_scored_cursors, make_max_scored_cursors, make_scored_cursors,
    BlockMaxScoredCursor, MaxScoredCursor, ScoredCursor,
};
pub use ef::EliasFano;
pub use error::{Error, Result};
pub use index::{InvertedIndex, InvertedIndexBuilder, MemorySource};
pub use postings::{write_posting_list, BlockData, BlockPostingCursor};
pub use query::algorithm::{
    and_query, or_query, BlockMaxMaxScoreQuery, BlockMaxRankedAndQuery, BlockMaxWandQuery,
    CancelFlag, MaxScoreQuery, RankedAndQuery, RankedOrQuery, RankedOrTaatQuery, WandQuery,
};
pub use query::{write_trec_run, Query, TermId, TermPolicy, WeightedTerm};
pub use scoring::{IndexScorer, LinearQuantizer, QuantizingScorer, ScorerParams, TermScorer};
pub use topk::TopKQueue;
pub use wand::{build_quantized_index, BlockPartition, WandCursor, WandData};
