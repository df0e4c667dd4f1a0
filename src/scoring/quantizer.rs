// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Linear score quantisation.
//!
//! Maps float partial scores into `[1, 2^bits − 1]` so they can ride in the
//! frequency slot of a posting list or in fixed-width WAND-data fields. The
//! mapping reserves 0 (a frequency of 0 cannot be stored: the posting layout
//! encodes `freq − 1`), sends 0.0 to 1, the configured maximum to the top of
//! the range, and rounds in between. Anything outside `[0, max]` is a caller
//! error, not a clamp.

use crate::error::{Error, Result};

/// Linear quantiser parameterised by the global maximum score and an output
/// width in bits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearQuantizer {
    max: f32,
    scale: f32,
    range: u32,
}

impl LinearQuantizer {
    /// `max` must be positive, `bits` in `[2, 32]`.
    pub fn new(max: f32, bits: u8) -> Result<Self> {
        if !(max > 0.0) {
            return Err(Error::InvalidArgument(format!(
                "quantizer max must be positive, got {}",
                max
            )));
        }
        if !(2..=32).contains(&bits) {
            return Err(Error::InvalidArgument(format!(
                "quantizer bits must be between 2 and 32, got {}",
                bits
            )));
        }
        let range = if bits == 32 { u32::MAX } else { (1u32 << bits) - 1 };
        Ok(LinearQuantizer {
            max,
            scale: (range - 1) as f32 / max,
            range,
        })
    }

    /// Quantise a score in `[0, max]`; rejects anything outside.
    pub fn quantize(&self, value: f32) -> Result<u32> {
        if !(0.0..=self.max).contains(&value) {
            return Err(Error::InvalidArgument(format!(
                "quantizer input must be between 0 and {}, got {}",
                self.max, value
            )));
        }
        Ok((value * self.scale).round() as u32 + 1)
    }

    /// Largest value the quantiser can produce: `2^bits − 1`.
    pub fn range(&self) -> u32 {
        self.range
    }

    /// The configured maximum input.
    pub fn max(&self) -> f32 {
        self.max
    }
}
