// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Okapi BM25.
//!
//! Robertson & Zaragoza: "The Probabilistic Relevance Framework: BM25 and
//! Beyond", Found. Trends Inf. Retr. 3(4), 2009. The IDF is clamped at a
//! small epsilon so terms present in nearly every document cannot turn a
//! match into a penalty.

use crate::wand::WandData;

use super::{IndexScorer, TermScorer};

/// Floor for the IDF of very frequent terms.
const EPSILON_IDF: f32 = 1e-6;

pub struct Bm25<'w> {
    wdata: &'w WandData,
    k1: f32,
    b: f32,
}

impl<'w> Bm25<'w> {
    pub fn new(wdata: &'w WandData, k1: f32, b: f32) -> Self {
        Bm25 { wdata, k1, b }
    }

    fn idf(&self, term_id: u32) -> f32 {
        let n = self.wdata.num_docs() as f32;
        let df = self.wdata.term_posting_count(term_id) as f32;
        (((n - df + 0.5) / (df + 0.5)).ln()).max(EPSILON_IDF)
    }
}

impl IndexScorer for Bm25<'_> {
    fn term_scorer(&self, term_id: u32) -> TermScorer<'_> {
        let idf = self.idf(term_id);
        let k1 = self.k1;
        let b = self.b;
        let wdata = self.wdata;
        Box::new(move |doc, freq| {
            let f = freq as f32;
            let norm_len = wdata.doc_len(doc) as f32 / wdata.avg_len();
            idf * (f * (k1 + 1.0)) / (f + k1 * (1.0 - b + b * norm_len))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rare_term_scores_higher() {
        let wdata = WandData::stats_for_tests(vec![5, 5, 5, 5, 5, 5, 5, 5], vec![(1, 1), (7, 9)]);
        let scorer = Bm25::new(&wdata, 0.9, 0.4);
        let rare = scorer.term_scorer(0);
        let common = scorer.term_scorer(1);
        assert!(rare(0, 1) > common(0, 1));
    }

    #[test]
    fn test_idf_never_negative() {
        // A term in every document would have negative raw IDF.
        let wdata = WandData::stats_for_tests(vec![5, 5], vec![(2, 4)]);
        let scorer = Bm25::new(&wdata, 0.9, 0.4);
        let s = scorer.term_scorer(0);
        assert!(s(0, 3) > 0.0);
    }
}
