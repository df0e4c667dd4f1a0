// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Ranked disjunction: score every document containing any query term.
//!
//! The reference the pruned processors are tested against: no skipping, no
//! bounds, just the frontier minimum and a sum of partial scores per
//! candidate.

use crate::cursor::ScoredCursor;
use crate::topk::TopKQueue;

use super::CancelFlag;

pub struct RankedOrQuery {
    topk: TopKQueue,
    cancel: CancelFlag,
}

impl RankedOrQuery {
    pub fn new(k: usize) -> Self {
        Self::with_queue(TopKQueue::new(k))
    }

    /// Run over a caller-configured queue (e.g. one with an initial
    /// threshold).
    pub fn with_queue(topk: TopKQueue) -> Self {
        RankedOrQuery { topk, cancel: CancelFlag::new() }
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Process the query; returns the number of results collected.
    pub fn run(&mut self, cursors: &mut [ScoredCursor], max_docid: u32) -> usize {
        self.topk.clear();
        if cursors.is_empty() || self.topk.capacity() == 0 {
            return 0;
        }

        let mut cur_doc = cursors.iter().map(|c| c.docid()).min().unwrap();
        while cur_doc < max_docid {
            if self.cancel.is_cancelled() {
                break;
            }
            let mut score = 0.0f32;
            let mut next_doc = max_docid;
            for cursor in cursors.iter_mut() {
                if cursor.docid() == cur_doc {
                    score += cursor.score();
                    cursor.next();
                }
                if cursor.docid() < next_doc {
                    next_doc = cursor.docid();
                }
            }
            self.topk.insert(score, cur_doc);
            cur_doc = next_doc;
        }

        self.topk.finalize();
        self.topk.len()
    }

    /// Results of the last run, best first.
    pub fn topk(&self) -> &[(f32, u32)] {
        self.topk.topk()
    }
}
