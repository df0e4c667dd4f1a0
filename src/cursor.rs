// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Scored cursors: a posting-list cursor bundled with its term's bound
//! scoring closure and query weight.
//!
//! Three tiers, each adding what the next processor family needs. A plain
//! [`ScoredCursor`] serves the exhaustive processors; [`MaxScoredCursor`]
//! adds the term's global score bound for WAND/MaxScore pruning;
//! [`BlockMaxScoredCursor`] additionally owns a WAND-data block cursor that
//! the BlockMax processors advance on demand (it trails the posting cursor
//! rather than moving in lockstep).
//!
//! All cursors of one query come out of a `make_*_cursors` factory in query
//! order, with one scoring closure bound per term up front so the hot loop
//! never re-dispatches.

use crate::error::Result;
use crate::index::InvertedIndex;
use crate::postings::BlockPostingCursor;
use crate::query::Query;
use crate::scoring::{IndexScorer, TermScorer};
use crate::wand::{WandCursor, WandData};

// ============================================================================
// SCORED CURSOR
// ============================================================================

/// Posting cursor plus bound scorer and query weight.
pub struct ScoredCursor<'a> {
    pub cursor: BlockPostingCursor<'a>,
    scorer: TermScorer<'a>,
    pub weight: f32,
}

impl ScoredCursor<'_> {
    #[inline]
    pub fn docid(&self) -> u32 {
        self.cursor.docid()
    }

    #[inline]
    pub fn freq(&mut self) -> u32 {
        self.cursor.freq()
    }

    /// Weighted partial score of the current posting.
    #[inline]
    pub fn score(&mut self) -> f32 {
        let docid = self.cursor.docid();
        let freq = self.cursor.freq();
        self.weight * (self.scorer)(docid, freq)
    }

    #[inline]
    pub fn next(&mut self) {
        self.cursor.next();
    }

    #[inline]
    pub fn next_geq(&mut self, target: u32) {
        self.cursor.next_geq(target);
    }

    /// Posting-list length, the sort key of the conjunctive processors.
    pub fn len(&self) -> usize {
        self.cursor.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cursor.is_empty()
    }
}

// ============================================================================
// MAX-SCORED CURSOR
// ============================================================================

/// [`ScoredCursor`] plus the term's weighted global score bound.
pub struct MaxScoredCursor<'a> {
    pub cursor: BlockPostingCursor<'a>,
    scorer: TermScorer<'a>,
    pub weight: f32,
    max_score: f32,
}

impl MaxScoredCursor<'_> {
    #[inline]
    pub fn docid(&self) -> u32 {
        self.cursor.docid()
    }

    #[inline]
    pub fn freq(&mut self) -> u32 {
        self.cursor.freq()
    }

    #[inline]
    pub fn score(&mut self) -> f32 {
        let docid = self.cursor.docid();
        let freq = self.cursor.freq();
        self.weight * (self.scorer)(docid, freq)
    }

    /// Upper bound on `score()` for any docid in this list.
    #[inline]
    pub fn max_score(&self) -> f32 {
        self.max_score
    }

    #[inline]
    pub fn next(&mut self) {
        self.cursor.next();
    }

    #[inline]
    pub fn next_geq(&mut self, target: u32) {
        self.cursor.next_geq(target);
    }

    pub fn len(&self) -> usize {
        self.cursor.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cursor.is_empty()
    }
}

// ============================================================================
// BLOCK-MAX-SCORED CURSOR
// ============================================================================

/// [`MaxScoredCursor`] plus a WAND-data block cursor for per-block bounds.
pub struct BlockMaxScoredCursor<'a> {
    pub cursor: BlockPostingCursor<'a>,
    scorer: TermScorer<'a>,
    pub weight: f32,
    max_score: f32,
    wand: WandCursor<'a>,
}

impl BlockMaxScoredCursor<'_> {
    #[inline]
    pub fn docid(&self) -> u32 {
        self.cursor.docid()
    }

    #[inline]
    pub fn freq(&mut self) -> u32 {
        self.cursor.freq()
    }

    #[inline]
    pub fn score(&mut self) -> f32 {
        let docid = self.cursor.docid();
        let freq = self.cursor.freq();
        self.weight * (self.scorer)(docid, freq)
    }

    #[inline]
    pub fn max_score(&self) -> f32 {
        self.max_score
    }

    #[inline]
    pub fn next(&mut self) {
        self.cursor.next();
    }

    #[inline]
    pub fn next_geq(&mut self, target: u32) {
        self.cursor.next_geq(target);
    }

    pub fn len(&self) -> usize {
        self.cursor.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cursor.is_empty()
    }

    /// Last docid covered by the current score block.
    #[inline]
    pub fn block_max_docid(&self) -> u32 {
        self.wand.docid()
    }

    /// Unweighted score bound of the current score block; callers multiply
    /// by [`Self::weight`].
    #[inline]
    pub fn block_max_score(&self) -> f32 {
        self.wand.score()
    }

    /// Advance the block cursor to the block covering `target`.
    #[inline]
    pub fn block_max_next_geq(&mut self, target: u32) {
        self.wand.next_geq(target);
    }
}

// ============================================================================
// FACTORIES
// ============================================================================

/// One [`ScoredCursor`] per query term, in query order.
pub fn make_scored_cursors<'a>(
    index: &'a InvertedIndex,
    scorer: &'a dyn IndexScorer,
    query: &Query,
) -> Result<Vec<ScoredCursor<'a>>> {
    query
        .terms()
        .iter()
        .map(|term| {
            Ok(ScoredCursor {
                cursor: index.cursor(term.id)?,
                scorer: scorer.term_scorer(term.id),
                weight: term.weight,
            })
        })
        .collect()
}

/// One [`MaxScoredCursor`] per query term, in query order.
pub fn make_max_scored_cursors<'a>(
    index: &'a InvertedIndex,
    wdata: &'a WandData,
    scorer: &'a dyn IndexScorer,
    query: &Query,
) -> Result<Vec<MaxScoredCursor<'a>>> {
    query
        .terms()
        .iter()
        .map(|term| {
            Ok(MaxScoredCursor {
                cursor: index.cursor(term.id)?,
                scorer: scorer.term_scorer(term.id),
                weight: term.weight,
                max_score: term.weight * wdata.max_term_weight(term.id),
            })
        })
        .collect()
}

/// One [`BlockMaxScoredCursor`] per query term, in query order.
pub fn make_block_max_scored_cursors<'a>(
    index: &'a InvertedIndex,
    wdata: &'a WandData,
    scorer: &'a dyn IndexScorer,
    query: &Query,
) -> Result<Vec<BlockMaxScoredCursor<'a>>> {
    query
        .terms()
        .iter()
        .map(|term| {
            Ok(BlockMaxScoredCursor {
                cursor: index.cursor(term.id)?,
                scorer: scorer.term_scorer(term.id),
                weight: term.weight,
                max_score: term.weight * wdata.max_term_weight(term.id),
                wand: wdata.cursor(term.id)?,
            })
        })
        .collect()
}
