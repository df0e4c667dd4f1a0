// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! DPH: hypergeometric divergence-from-randomness weighting, parameter free.
//!
//! Amati, Ambrosi, Bianchi, Gaibisso, Gambosi: "FUB, IASI-CNR and University
//! of Tor Vergata at TREC 2007 Blog Track", TREC 2007.

use std::f32::consts::PI;

use crate::wand::WandData;

use super::{IndexScorer, TermScorer};

pub struct Dph<'w> {
    wdata: &'w WandData,
}

impl<'w> Dph<'w> {
    pub fn new(wdata: &'w WandData) -> Self {
        Dph { wdata }
    }
}

impl IndexScorer for Dph<'_> {
    fn term_scorer(&self, term_id: u32) -> TermScorer<'_> {
        let wdata = self.wdata;
        let occurrences = wdata.term_occurrence_count(term_id) as f32;
        Box::new(move |doc, freq| {
            let fr = freq as f32;
            let doc_len = wdata.doc_len(doc) as f32;
            let f = fr / doc_len;
            let norm = (1.0 - f) * (1.0 - f) / (fr + 1.0);
            norm
                * (fr
                    * ((fr * wdata.avg_len() / doc_len) * (wdata.num_docs() as f32 / occurrences))
                        .log2()
                    + 0.5 * (2.0 * PI * fr * (1.0 - f)).log2())
        })
    }
}
