// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! WAND: max-score pruned disjunction.
//!
//! Broder, Carmel, Herscovici, Soffer, Zien: "Efficient query evaluation
//! using a two-level retrieval process", CIKM 2003. Cursors stay sorted by
//! current docid; the pivot is the first position where the running sum of
//! term upper bounds beats the queue threshold. Everything before the pivot
//! either already sits on the pivot document (then it is scored fully) or
//! one lagging cursor jumps forward. Only one cursor moves per step, so a
//! single bubble pass restores the ordering.

use crate::cursor::MaxScoredCursor;
use crate::topk::TopKQueue;

use super::CancelFlag;

pub struct WandQuery {
    topk: TopKQueue,
    cancel: CancelFlag,
}

impl WandQuery {
    pub fn new(k: usize) -> Self {
        Self::with_queue(TopKQueue::new(k))
    }

    pub fn with_queue(topk: TopKQueue) -> Self {
        WandQuery { topk, cancel: CancelFlag::new() }
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
        ordered.sort_by_key(|c| c.docid());

        loop {
            if self.cancel.is_cancelled() {
                break;
            }

            // Find the pivot: the first prefix whose bound beats the
            // threshold.
            let mut upper_bound = 0.0f32;
            let mut pivot = 0;
            let mut found_pivot = false;
            while pivot < ordered.len() {
                if ordered[pivot].docid() >= max_docid {
                    break;
                }
                upper_bound += ordered[pivot].max_score();
                if self.topk.would_enter(upper_bound) {
                    found_pivot = true;
                    break;
                }
                pivot += 1;
            }
            if !found_pivot {
                break;
            }

            let pivot_id = ordered[pivot].docid();
            if pivot_id == ordered[0].docid() {
                // All cursors up to the pivot sit on the pivot document.
                let mut score = 0.0f32;
                for cursor in ordered.iter_mut() {
                    if cursor.docid() != pivot_id {
                        break;
                    }
                    score += cursor.score();
                    cursor.next();
                }
                self.topk.insert(score, pivot_id);
                ordered.sort_by_key(|c| c.docid());
            } else {
                // Move the deepest lagging cursor up to the pivot.
                let mut next_list = pivot;
                while ordered[next_list].docid() == pivot_id {
                    next_list -= 1;
                }
                ordered[next_list].next_geq(pivot_id);
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

/// Restore docid order after `ordered[from]` advanced.
pub(super) fn bubble_down<C>(ordered: &mut [&mut C], from: usize, docid: impl Fn(&C) -> u32) {
    let mut i = from + 1;
    while i < ordered.len() {
        if docid(&*ordered[i]) < docid(&*ordered[i - 1]) {
            ordered.swap(i, i - 1);
            i += 1;
        } else {
            break;
        }
    }
}
