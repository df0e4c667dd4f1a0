// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The query processors.
//!
//! Nine algorithms over the cursor abstractions, from exhaustive to
//! aggressively pruned:
//!
//! | processor | cursors | pruning |
//! |---|---|---|
//! | [`and_query`] / [`or_query`] | plain | none (unranked counts) |
//! | [`RankedOrQuery`] | scored | none |
//! | [`RankedAndQuery`] | scored | conjunction skipping |
//! | [`WandQuery`] | max-scored | term upper bounds |
//! | [`MaxScoreQuery`] | max-scored | essential/non-essential split |
//! | [`BlockMaxWandQuery`] | block-max-scored | term + block bounds |
//! | [`BlockMaxMaxScoreQuery`] | block-max-scored | split + block bounds |
//! | [`BlockMaxRankedAndQuery`] | block-max-scored | conjunction + block bounds |
//! | [`RankedOrTaatQuery`] | scored | accumulator sweep |
//!
//! Every processor owns its [`TopKQueue`], takes `(cursors, max_docid)`,
//! and checks a [`CancelFlag`] between outer iterations so callers can
//! bound latency; a cancelled run keeps whatever the queue holds. All of
//! them treat an empty cursor set and `k = 0` as "no results" without
//! touching a posting.

mod and;
mod block_max_maxscore;
mod block_max_ranked_and;
mod block_max_wand;
mod maxscore;
mod or;
mod ranked_and;
mod ranked_or;
mod ranked_or_taat;
mod wand;

pub use and::and_query;
pub use block_max_maxscore::BlockMaxMaxScoreQuery;
pub use block_max_ranked_and::BlockMaxRankedAndQuery;
pub use block_max_wand::BlockMaxWandQuery;
pub use maxscore::MaxScoreQuery;
pub use or::or_query;
pub use ranked_and::RankedAndQuery;
pub use ranked_or::RankedOrQuery;
pub use ranked_or_taat::RankedOrTaatQuery;
pub use wand::WandQuery;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation token shared between a query processor and the
/// caller that wants to bound its latency. Clones share one flag.
#[derive(Clone)]
pub struct CancelFlag {
    flag: Arc<AtomicBool>,
}

impl CancelFlag {
    pub fn new() -> Self {
        CancelFlag { flag: Arc::new(AtomicBool::new(false)) }
    }

    /// Ask the processor to stop at its next outer-loop check.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

impl Default for CancelFlag {
    fn default() -> Self {
        Self::new()
    }
}
