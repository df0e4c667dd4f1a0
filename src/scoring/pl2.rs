// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! PL2: Poisson model with Laplace after-effect and H2 normalisation.
//!
//! Amati: "Probabilistic models for information retrieval based on
//! divergence from randomness", PhD thesis, University of Glasgow, 2003.
//! The free parameter `c` scales the length normalisation. Note the model
//! mixes base-2 and natural logarithms; that follows the reference
//! formulation.

use std::f32::consts::PI;

use crate::wand::WandData;

use super::{IndexScorer, TermScorer};

pub struct Pl2<'w> {
    wdata: &'w WandData,
    c: f32,
}

impl<'w> Pl2<'w> {
    pub fn new(wdata: &'w WandData, c: f32) -> Self {
        Pl2 { wdata, c }
    }
}

impl IndexScorer for Pl2<'_> {
    fn term_scorer(&self, term_id: u32) -> TermScorer<'_> {
        let wdata = self.wdata;
        let c = self.c;
        let occurrences = wdata.term_occurrence_count(term_id) as f32;
        Box::new(move |doc, freq| {
            let tfn =
                freq as f32 * (1.0 + (c * wdata.avg_len()) / wdata.doc_len(doc) as f32).log2();
            let norm = 1.0 / (tfn + 1.0);
            let f = occurrences / wdata.num_docs() as f32;
            let e = 0.5f32.ln();
            norm * (tfn * (1.0 / f).log2()
                + f * e
                + 0.5 * (2.0 * PI * tfn).log2()
                + tfn * (tfn.log2() - e))
        })
    }
}
