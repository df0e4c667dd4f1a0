// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! BlockMax-Ranked-AND: conjunction with a block-level bound gate.
//!
//! The candidate stream is ranked AND's; before any cursor alignment work,
//! every term's block bound at the candidate is summed. If the blocks
//! cannot beat the threshold, the candidate jumps straight past the
//! tightest block boundary, skipping the whole dead configuration.

use crate::cursor::BlockMaxScoredCursor;
use crate::topk::TopKQueue;

use super::CancelFlag;

pub struct BlockMaxRankedAndQuery {
    topk: TopKQueue,
    cancel: CancelFlag,
}

impl BlockMaxRankedAndQuery {
    pub fn new(k: usize) -> Self {
        Self::with_queue(TopKQueue::new(k))
    }

    pub fn with_queue(topk: TopKQueue) -> Self {
        BlockMaxRankedAndQuery { topk, cancel: CancelFlag::new() }
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Process the query; cursors are reordered by list length.
    pub fn run(&mut self, cursors: &mut [BlockMaxScoredCursor], max_docid: u32) -> usize {
        self.topk.clear();
        if cursors.is_empty() || self.topk.capacity() == 0 {
            return 0;
        }
        cursors.sort_by_key(|c| c.len());

        let mut candidate = cursors[0].docid();
        let mut i = 1usize;
        while candidate < max_docid {
            if self.cancel.is_cancelled() {
                break;
            }

            // Gate on the block bounds of every term at the candidate.
            let mut block_upper_bound = 0.0f32;
            for cursor in cursors.iter_mut() {
                cursor.block_max_next_geq(candidate);
                block_upper_bound += cursor.block_max_score() * cursor.weight;
            }

            if self.topk.would_enter(block_upper_bound) {
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
            } else {
                // Jump past the tightest block boundary, re-anchoring the
                // candidate on the driving cursor so a full match always
                // has every list aligned. A jump that cannot move forward
                // means the block tables are exhausted.
                let mut next_jump = max_docid;
                for cursor in cursors.iter() {
                    next_jump = next_jump.min(cursor.block_max_docid());
                }
                let target = next_jump.saturating_add(1);
                if target <= candidate {
                    candidate = max_docid;
                } else {
                    cursors[0].next_geq(target);
                    candidate = cursors[0].docid();
                    i = 1;
                }
            }
        }

        self.topk.finalize();
        self.topk.len()
    }

    pub fn topk(&self) -> &[(f32, u32)] {
        self.topk.topk()
    }
}
