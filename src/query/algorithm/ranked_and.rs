// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Ranked conjunction: the unranked AND skipping discipline, scoring each
//! survivor with the sum of its partial scores.

use crate::cursor::ScoredCursor;
use crate::topk::TopKQueue;

use super::CancelFlag;

pub struct RankedAndQuery {
    topk: TopKQueue,
    cancel: CancelFlag,
}

impl RankedAndQuery {
    pub fn new(k: usize) -> Self {
        Self::with_queue(TopKQueue::new(k))
    }

    pub fn with_queue(topk: TopKQueue) -> Self {
        RankedAndQuery { topk, cancel: CancelFlag::new() }
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Process the query; cursors are reordered by list length.
    pub fn run(&mut self, cursors: &mut [ScoredCursor], max_docid: u32) -> usize {
        self.topk.clear();
        if cursors.is_empty() || self.topk.capacity() == 0 {
            return 0;
        }
        cursors.sort_by_key(|c| c.len());

        let mut candidate = cursors[0].docid();
        let mut i = 1;
        while candidate < max_docid {
            if self.cancel.is_cancelled() {
                break;
            }
            while i < cursors.len() {
                cursors[i].next_geq(candidate);
                if cursors[i].docid() != candidate {
                    candidate = cursors[i].docid();
                    i = 0;
                    break;
                }
                i += 1;
            }
            if i == cursors.len() {
                let mut score = 0.0f32;
                for cursor in cursors.iter_mut() {
                    score += cursor.score();
                }
                self.topk.insert(score, candidate);

                cursors[0].next();
                candidate = cursors[0].docid();
                i = 1;
            }
        }

        self.topk.finalize();
        self.topk.len()
    }

    pub fn topk(&self) -> &[(f32, u32)] {
        self.topk.topk()
    }
}
