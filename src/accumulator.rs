// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Score accumulators for term-at-a-time processing.
//!
//! TAAT walks one whole posting list after another, summing partial scores
//! per document; the accumulator is that per-document sum. Two designs:
//! [`SimpleAccumulator`] is a dense array zeroed between queries, and
//! [`LazyAccumulator`] splits the array into W-wide buckets tagged with a
//! generation counter so a reset touches only the tags, O(D/W) instead of
//! O(D), at the cost of one tag check per access.
//!
//! After a query, for every document touched at least once, the stored
//! value equals the sum of all deltas applied since the last reset.

use crate::topk::TopKQueue;

/// Partial-score accumulator: reset, add, then push survivors into a queue.
pub trait Accumulator {
    /// Make the accumulator ready for the next query.
    fn reset(&mut self);

    /// Add a partial score for one document.
    fn accumulate(&mut self, docid: u32, score: f32);

    /// Push every live non-losing entry into `topk`.
    fn collect(&self, topk: &mut TopKQueue);

    /// Number of accumulator slots (the document universe).
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// SIMPLE
// ============================================================================

/// Dense array of scores; element `d` is the running score of document `d`.
pub struct SimpleAccumulator {
    scores: Vec<f32>,
}

impl SimpleAccumulator {
    pub fn new(size: usize) -> Self {
        SimpleAccumulator { scores: vec![0.0; size] }
    }
}

impl Accumulator for SimpleAccumulator {
    fn reset(&mut self) {
        self.scores.fill(0.0);
    }

    #[inline]
    fn accumulate(&mut self, docid: u32, score: f32) {
        self.scores[docid as usize] += score;
    }

    fn collect(&self, topk: &mut TopKQueue) {
        for (docid, &score) in self.scores.iter().enumerate() {
            if topk.would_enter(score) {
                topk.insert(score, docid as u32);
            }
        }
    }

    fn len(&self) -> usize {
        self.scores.len()
    }
}

// ============================================================================
// LAZY (GENERATIONAL)
// ============================================================================

#[derive(Clone)]
struct Bucket<const W: usize> {
    generation: u32,
    counters: [f32; W],
}

/// Generationally-reset accumulator with `W` counters per bucket.
///
/// `W` trades reset cost against tag-check overhead; 4–8 works well. A
/// bucket whose tag lags the live generation reads as all zeros and is
/// re-initialised on first write.
pub struct LazyAccumulator<const W: usize = 8> {
    buckets: Vec<Bucket<W>>,
    generation: u32,
    size: usize,
}

impl<const W: usize> LazyAccumulator<W> {
    pub fn new(size: usize) -> Self {
        let bucket_count = crate::bits::ceil_div(size.max(1), W);
        LazyAccumulator {
            buckets: vec![
                Bucket { generation: 0, counters: [0.0; W] };
                bucket_count
            ],
            generation: 1,
            size,
        }
    }
}

impl<const W: usize> Accumulator for LazyAccumulator<W> {
    fn reset(&mut self) {
        // Bumping the generation invalidates every bucket at once; the rare
        // wrap-around pays the full clear.
        if self.generation == u32::MAX {
            for bucket in &mut self.buckets {
                bucket.generation = 0;
                bucket.counters = [0.0; W];
            }
            self.generation = 1;
        } else {
            self.generation += 1;
        }
    }

    #[inline]
    fn accumulate(&mut self, docid: u32, score: f32) {
        let bucket = &mut self.buckets[docid as usize / W];
        if bucket.generation != self.generation {
            bucket.generation = self.generation;
            bucket.counters = [0.0; W];
        }
        bucket.counters[docid as usize % W] += score;
    }

    fn collect(&self, topk: &mut TopKQueue) {
        for (b, bucket) in self.buckets.iter().enumerate() {
            if bucket.generation != self.generation {
                continue;
            }
            for (i, &score) in bucket.counters.iter().enumerate() {
                let docid = b * W + i;
                if docid < self.size && topk.would_enter(score) {
                    topk.insert(score, docid as u32);
                }
            }
        }
    }

    fn len(&self) -> usize {
        self.size
    }
}
