// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! QLD: query likelihood with Dirichlet smoothing.
//!
//! Zhai & Lafferty: "A study of smoothing methods for language models
//! applied to ad hoc information retrieval", SIGIR 2001. Scores are clamped
//! at zero so documents shorter than the smoothing mass cannot go negative
//! and upset the max-score bounds.

use crate::wand::WandData;

use super::{IndexScorer, TermScorer};

pub struct Qld<'w> {
    wdata: &'w WandData,
    mu: f32,
}

impl<'w> Qld<'w> {
    pub fn new(wdata: &'w WandData, mu: f32) -> Self {
        Qld { wdata, mu }
    }
}

impl IndexScorer for Qld<'_> {
    fn term_scorer(&self, term_id: u32) -> TermScorer<'_> {
        let wdata = self.wdata;
        let mu = self.mu;
        let collection_prob =
            wdata.term_occurrence_count(term_id) as f32 / wdata.collection_len() as f32;
        Box::new(move |doc, freq| {
            let numerator = 1.0 + freq as f32 / (mu * collection_prob);
            let denominator = mu / (wdata.doc_len(doc) as f32 + mu);
            (numerator.ln() + denominator.ln()).max(0.0)
        })
    }
}
