// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! BlockMax-MaxScore: the essential/non-essential split of MaxScore with
//! the block-level bound refinement of BlockMax-WAND.
//!
//! Before probing non-essential lists for a candidate, their term-level
//! bounds are tightened to block-level ones; the probe itself keeps
//! shrinking the bound as real scores replace block maxima, abandoning the
//! document the moment it cannot reach the threshold.

use crate::cursor::BlockMaxScoredCursor;
use crate::topk::TopKQueue;

use super::CancelFlag;

pub struct BlockMaxMaxScoreQuery {
    topk: TopKQueue,
    cancel: CancelFlag,
}

impl BlockMaxMaxScoreQuery {
    pub fn new(k: usize) -> Self {
        Self::with_queue(TopKQueue::new(k))
    }

    pub fn with_queue(topk: TopKQueue) -> Self {
        BlockMaxMaxScoreQuery { topk, cancel: CancelFlag::new() }
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn run(&mut self, cursors: &mut [BlockMaxScoredCursor], max_docid: u32) -> usize {
        self.topk.clear();
        if cursors.is_empty() || self.topk.capacity() == 0 {
            return 0;
        }

        let mut ordered: Vec<&mut BlockMaxScoredCursor> = cursors.iter_mut().collect();
        ordered.sort_by(|a, b| {
            a.max_score()
                .partial_cmp(&b.max_score())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut upper_bounds = vec![0.0f32; ordered.len()];
        upper_bounds[0] = ordered[0].max_score();
        for i in 1..ordered.len() {
            upper_bounds[i] = upper_bounds[i - 1] + ordered[i].max_score();
        }

        let mut non_essential = 0usize;
        let mut cur_doc = ordered.iter().map(|c| c.docid()).min().unwrap();

        while non_essential < ordered.len() && cur_doc < max_docid {
            if self.cancel.is_cancelled() {
                break;
            }
            let mut score = 0.0f32;
            let mut next_doc = max_docid;
            for cursor in ordered[non_essential..].iter_mut() {
                if cursor.docid() == cur_doc {
                    score += cursor.score();
                    cursor.next();
                }
                if cursor.docid() < next_doc {
                    next_doc = cursor.docid();
                }
            }

            // Tighten the non-essential bound from term level to block
            // level before paying for any next_geq.
            let mut block_upper_bound = if non_essential > 0 {
                upper_bounds[non_essential - 1]
            } else {
                0.0
            };
            for i in (0..non_essential).rev() {
                if ordered[i].block_max_docid() < cur_doc {
                    ordered[i].block_max_next_geq(cur_doc);
                }
                block_upper_bound -=
                    ordered[i].max_score() - ordered[i].block_max_score() * ordered[i].weight;
                if !self.topk.would_enter(score + block_upper_bound) {
                    break;
                }
            }

            if self.topk.would_enter(score + block_upper_bound) {
                // Probe the non-essential lists, replacing block bounds
                // with real scores until the document wins or falls out.
                for i in (0..non_essential).rev() {
                    ordered[i].next_geq(cur_doc);
                    if ordered[i].docid() == cur_doc {
                        block_upper_bound += ordered[i].score();
                    }
                    block_upper_bound -= ordered[i].block_max_score() * ordered[i].weight;
                    if !self.topk.would_enter(score + block_upper_bound) {
                        break;
                    }
                }
                score += block_upper_bound;
            }

            if self.topk.insert(score, cur_doc) {
                while non_essential < ordered.len()
                    && !self.topk.would_enter(upper_bounds[non_essential])
                {
                    non_essential += 1;
                }
            }
            cur_doc = next_doc;
        }

        self.topk.finalize();
        self.topk.len()
    }

    pub fn topk(&self) -> &[(f32, u32)] {
        self.topk.topk()
    }
}
