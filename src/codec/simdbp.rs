// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! SimdBP: whole-block binary packing at the block's maximum bit width.
//!
//! Lemire & Boytsov: "Decoding billions of integers per second through
//! vectorization", Softw. Pract. Exper. 45(1), 2015. One width byte, then
//! all 128 values packed at that width: exactly `16·b` payload bytes, the
//! same footprint as the SIMD-BP128 lanes this layout comes from.

use super::{interpolative, pack_bits, unpack_bits, BlockCodec, BLOCK_SIZE};

/// SimdBP block codec (`block_simdbp`).
pub struct SimdBpBlockCodec;

impl BlockCodec for SimdBpBlockCodec {
    fn name(&self) -> &'static str {
        "block_simdbp"
    }

    fn encode(&self, input: &[u32], sum_of_values: Option<u32>, n: usize, out: &mut Vec<u8>) {
        debug_assert!(n <= BLOCK_SIZE);
        if n < BLOCK_SIZE {
            interpolative::encode(input, sum_of_values, n, out);
            return;
        }
        let input = &input[..n];
        let max = input.iter().copied().max().unwrap_or(0);
        let b = if max == 0 { 0 } else { max.ilog2() + 1 };
        out.push(b as u8);
        pack_bits(input, b, out);
    }

    fn decode<'a>(
        &self,
        input: &'a [u8],
        out: &mut [u32],
        sum_of_values: Option<u32>,
        n: usize,
    ) -> &'a [u8] {
        debug_assert!(n <= BLOCK_SIZE);
        if n < BLOCK_SIZE {
            return interpolative::decode(input, out, sum_of_values, n);
        }
        let b = u32::from(input[0]);
        let read = unpack_bits(&input[1..], b, &mut out[..n]);
        &input[1 + read..]
    }
}
