// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! BlockMax-WAND: WAND with per-block bound refinement.
//!
//! Ding & Suel: "Faster top-k document retrieval using block-max indexes",
//! SIGIR 2011. After WAND's term-level pivot test, the per-block bounds are
//! consulted: each cursor's block iterator advances to the pivot document
//! and the weighted block maxima are summed. If even that refined bound
//! cannot beat the threshold, the whole block configuration is skipped to
//! the next interesting docid rather than one posting at a time.

use crate::cursor::BlockMaxScoredCursor;
use crate::topk::TopKQueue;

use super::wand::bubble_down;
use super::CancelFlag;

pub struct BlockMaxWandQuery {
    topk: TopKQueue,
    cancel: CancelFlag,
}

impl BlockMaxWandQuery {
    pub fn new(k: usize) -> Self {
        Self::with_queue(TopKQueue::new(k))
    }

    pub fn with_queue(topk: TopKQueue) -> Self {
        BlockMaxWandQuery { topk, cancel: CancelFlag::new() }
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
        ordered.sort_by_key(|c| c.docid());

        loop {
            if self.cancel.is_cancelled() {
                break;
            }

            // Term-level pivot selection, extended over ties on the pivot
            // document.
            let mut upper_bound = 0.0f32;
            let mut pivot = 0;
            let mut found_pivot = false;
            let mut pivot_id = max_docid;
            while pivot < ordered.len() {
                if ordered[pivot].docid() >= max_docid {
                    break;
                }
                upper_bound += ordered[pivot].max_score();
                if self.topk.would_enter(upper_bound) {
                    found_pivot = true;
                    pivot_id = ordered[pivot].docid();
                    while pivot + 1 < ordered.len() && ordered[pivot + 1].docid() == pivot_id {
                        pivot += 1;
                    }
                    break;
                }
                pivot += 1;
            }
            if !found_pivot {
                break;
            }

            // Refine with block-level bounds up to and including the pivot.
            let mut block_upper_bound = 0.0f32;
            for cursor in ordered[..=pivot].iter_mut() {
                if cursor.block_max_docid() < pivot_id {
                    cursor.block_max_next_geq(pivot_id);
                }
                block_upper_bound += cursor.block_max_score() * cursor.weight;
            }

            if self.topk.would_enter(block_upper_bound) {
                if pivot_id == ordered[0].docid() {
                    // Score the pivot document, shrinking the bound as real
                    // scores replace block maxima.
                    let mut score = 0.0f32;
                    for cursor in ordered.iter_mut() {
                        if cursor.docid() != pivot_id {
                            break;
                        }
                        let partial = cursor.score();
                        score += partial;
                        block_upper_bound -= cursor.block_max_score() * cursor.weight - partial;
                        if !self.topk.would_enter(block_upper_bound) {
                            break;
                        }
                    }
                    for cursor in ordered.iter_mut() {
                        if cursor.docid() != pivot_id {
                            break;
                        }
                        cursor.next();
                    }

                    self.topk.insert(score, pivot_id);
                    ordered.sort_by_key(|c| c.docid());
                } else {
                    let mut next_list = pivot;
                    while ordered[next_list].docid() == pivot_id {
                        next_list -= 1;
                    }
                    ordered[next_list].next_geq(pivot_id);
                    bubble_down(&mut ordered, next_list, |c| c.docid());
                }
            } else {
                // The blocks covering the pivot cannot produce a winner;
                // jump past the tightest block boundary. The advanced
                // cursor is the heaviest one, where the skip saves most.
                let mut next_list = pivot;
                let mut weight = ordered[next_list].weight;
                for i in 0..pivot {
                    if ordered[i].weight > weight {
                        next_list = i;
                        weight = ordered[i].weight;
                    }
                }

                let mut next_jump = max_docid;
                if pivot + 1 < ordered.len() {
                    next_jump = next_jump.min(ordered[pivot + 1].docid());
                }
                for cursor in ordered[..=pivot].iter() {
                    next_jump = next_jump.min(cursor.block_max_docid());
                }

                let mut next = next_jump.saturating_add(1);
                if pivot + 1 < ordered.len() && next > ordered[pivot + 1].docid() {
                    next = ordered[pivot + 1].docid();
                }
                if next <= ordered[pivot].docid() {
                    next = ordered[pivot].docid().saturating_add(1);
                }

                ordered[next_list].next_geq(next);
                bubble_down(&mut ordered, next_list, |c| c.docid());
            }
        }

        self.topk.finalize();
        self.topk.len()
    }

    pub fn topk(&self) -> &[(f32, u32)] {
        self.topk.topk()
    }

    /// Current queue threshold; exposed so tests can watch it rise.
    pub fn threshold(&self) -> f32 {
        self.topk.threshold()
    }
}
