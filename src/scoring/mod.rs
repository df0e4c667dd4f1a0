// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Term scorers: frequency → partial-score functions backed by WAND data.
//!
//! A scorer binds one closure per term per query through
//! [`IndexScorer::term_scorer`]; the hot loop then calls that closure per
//! matching document with no further dispatch. All collection statistics
//! (document lengths, term occurrence counts, average length) come from the
//! [`WandData`] the scorer borrows.
//!
//! Five scorers ship: BM25, DPH, PL2, QLD, and the trivial `quantized`
//! scorer that reads pre-quantised scores out of the frequency slot.
//! Parameter defaults (k1 = 0.9, b = 0.4, c = 1.0, mu = 1000) follow the
//! values the retrieval literature settled on for web-scale collections.

mod bm25;
mod dph;
mod pl2;
mod qld;
mod quantized;
mod quantizer;

pub use bm25::Bm25;
pub use dph::Dph;
pub use pl2::Pl2;
pub use qld::Qld;
pub use quantized::{Quantized, QuantizingScorer};
pub use quantizer::LinearQuantizer;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::wand::WandData;

/// A term's bound scoring closure: `(docid, freq) → partial score`.
pub type TermScorer<'a> = Box<dyn Fn(u32, u32) -> f32 + Send + Sync + 'a>;

/// Factory of per-term scoring closures.
pub trait IndexScorer: Send + Sync {
    fn term_scorer(&self, term_id: u32) -> TermScorer<'_>;
}

/// Scorer selection plus every tunable parameter, with documented defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerParams {
    /// One of `bm25`, `dph`, `pl2`, `qld`, `quantized`.
    pub name: String,
    /// BM25 saturation.
    pub k1: f32,
    /// BM25 length normalisation.
    pub b: f32,
    /// PL2 length-normalisation strength.
    pub c: f32,
    /// QLD Dirichlet smoothing mass.
    pub mu: f32,
}

impl Default for ScorerParams {
    fn default() -> Self {
        ScorerParams {
            name: "bm25".to_string(),
            k1: 0.9,
            b: 0.4,
            c: 1.0,
            mu: 1000.0,
        }
    }
}

impl ScorerParams {
    pub fn new(name: &str) -> Self {
        ScorerParams {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

/// Construct the scorer a [`ScorerParams`] names, bound to `wdata`.
pub fn from_params<'w>(
    params: &ScorerParams,
    wdata: &'w WandData,
) -> Result<Box<dyn IndexScorer + 'w>> {
    match params.name.as_str() {
        "bm25" => Ok(Box::new(Bm25::new(wdata, params.k1, params.b))),
        "dph" => Ok(Box::new(Dph::new(wdata))),
        "pl2" => Ok(Box::new(Pl2::new(wdata, params.c))),
        "qld" => Ok(Box::new(Qld::new(wdata, params.mu))),
        "quantized" => Ok(Box::new(Quantized)),
        other => Err(Error::InvalidArgument(format!(
            "unknown scorer: {}",
            other
        ))),
    }
}
