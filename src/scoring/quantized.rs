// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The quantised scoring path.
//!
//! A quantised index stores pre-computed integer scores in the frequency
//! slot of each posting, so query-time "scoring" is just reading the slot
//! back: that is [`Quantized`]. [`QuantizingScorer`] is the build-time side,
//! composing a real scorer with a [`LinearQuantizer`] to produce those
//! integers.

use crate::error::Result;

use super::{IndexScorer, LinearQuantizer, TermScorer};

/// Query-time scorer for quantised indexes: the frequency already is the
/// partial score.
pub struct Quantized;

impl IndexScorer for Quantized {
    fn term_scorer(&self, _term_id: u32) -> TermScorer<'_> {
        Box::new(|_doc, freq| freq as f32)
    }
}

/// Composes a float scorer with a quantiser to produce integer scores for
/// embedding into the frequency slot. Used only at index build time, hence
/// the fallible closure: a score outside the quantiser's range is a build
/// input error, not a query-time condition.
pub struct QuantizingScorer<'s> {
    scorer: &'s dyn IndexScorer,
    quantizer: LinearQuantizer,
}

impl<'s> QuantizingScorer<'s> {
    pub fn new(scorer: &'s dyn IndexScorer, quantizer: LinearQuantizer) -> Self {
        QuantizingScorer { scorer, quantizer }
    }

    /// Bound integer scorer for one term.
    pub fn term_scorer(&self, term_id: u32) -> impl Fn(u32, u32) -> Result<u32> + '_ {
        let inner = self.scorer.term_scorer(term_id);
        let quantizer = self.quantizer;
        move |doc, freq| quantizer.quantize(inner(doc, freq))
    }
}
