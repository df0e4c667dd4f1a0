// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! MaxScore: essential-list pruned disjunction.
//!
//! Turtle & Flood: "Query evaluation: strategies and optimizations", Inf.
//! Process. Manag. 31(6), 1995. Cursors sort by term upper bound; the
//! prefix whose cumulative bound cannot beat the threshold is
//! "non-essential" and never drives a candidate. Candidates come from the
//! essential suffix; non-essential lists are probed back-to-front only
//! while the remaining bound still leaves the document a chance.

use crate::cursor::MaxScoredCursor;
use crate::topk::TopKQueue;

use super::CancelFlag;

pub struct MaxScoreQuery {
    topk: TopKQueue,
    cancel: CancelFlag,
}

impl MaxScoreQuery {
    pub fn new(k: usize) -> Self {
        Self::with_queue(TopKQueue::new(k))
    }

    pub fn with_queue(topk: TopKQueue) -> Self {
        MaxScoreQuery { topk, cancel: CancelFlag::new() }
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn run(&mut self, cursors: &mut [MaxScoredCursor], max_docid: u32) -> usize {
        self.topk.clear();
        if cursors.is_empty() || self.topk.capacity() == 0 {
            return 0;
        }

        let mut ordered: Vec<&mut MaxScoredCursor> = cursors.iter_mut().collect();
        ordered.sort_by(|a, b| {
            a.max_score()
                .partial_cmp(&b.max_score())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        // Cumulative bounds of the max-score-sorted prefix.
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

            // Try to complete the score with the non-essential lists,
            // richest bound first.
            for i in (0..non_essential).rev() {
                if !self.topk.would_enter(score + upper_bounds[i]) {
                    break;
                }
                ordered[i].next_geq(cur_doc);
                if ordered[i].docid() == cur_doc {
                    score += ordered[i].score();
                }
            }

            if self.topk.insert(score, cur_doc) {
                // A higher threshold may demote more lists.
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
