// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Term-at-a-time ranked disjunction.
//!
//! Each term's whole posting list is swept into the accumulator before the
//! next term starts; the final pass over the accumulator fills the queue.
//! Generic over the accumulator so the dense and generational designs run
//! through identical machinery.

use crate::accumulator::Accumulator;
use crate::cursor::ScoredCursor;
use crate::topk::TopKQueue;

use super::CancelFlag;

pub struct RankedOrTaatQuery {
    topk: TopKQueue,
    cancel: CancelFlag,
}

impl RankedOrTaatQuery {
    pub fn new(k: usize) -> Self {
        Self::with_queue(TopKQueue::new(k))
    }

    pub fn with_queue(topk: TopKQueue) -> Self {
        RankedOrTaatQuery { topk, cancel: CancelFlag::new() }
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Process the query through `accumulator`, which must span the
    /// document universe.
    pub fn run<A: Accumulator>(
        &mut self,
        cursors: &mut [ScoredCursor],
        max_docid: u32,
        accumulator: &mut A,
    ) -> usize {
        debug_assert!(accumulator.len() >= max_docid as usize);
        self.topk.clear();
        if cursors.is_empty() || self.topk.capacity() == 0 {
            return 0;
        }
        accumulator.reset();

        for cursor in cursors.iter_mut() {
            if self.cancel.is_cancelled() {
                break;
            }
            while cursor.docid() < max_docid {
                accumulator.accumulate(cursor.docid(), cursor.score());
                cursor.next();
            }
        }
        accumulator.collect(&mut self.topk);

        self.topk.finalize();
        self.topk.len()
    }

    pub fn topk(&self) -> &[(f32, u32)] {
        self.topk.topk()
    }
}
