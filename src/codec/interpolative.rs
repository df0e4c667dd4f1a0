// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binary interpolative coding over the prefix sums of a block.
//!
//! Moffat & Stuiver (2000). The block is turned into its prefix-sum
//! sequence; the last prefix sum is the block total, which either comes from
//! the caller (document gaps, where the block header fixes the sum) or is
//! written as a variable-byte prefix (frequencies). Everything before the
//! last element is then coded recursively with minimal binary codes, each
//! value bounded by its already-known neighbours.
//!
//! Every other codec in the registry delegates partial blocks here, so this
//! module is the single place that understands `n < BLOCK_SIZE`.

use crate::bits::{BitReader, BitWriter};

use super::varint::TightVariableByte;
use super::{BlockCodec, BLOCK_SIZE};

/// Stateless encode used both by the registered codec and by every other
/// codec's short-tail fallback.
pub(crate) fn encode(input: &[u32], sum_of_values: Option<u32>, n: usize, out: &mut Vec<u8>) {
    debug_assert!(n >= 1 && n <= BLOCK_SIZE);
    let mut prefix = Vec::with_capacity(n);
    let mut acc = 0u32;
    for &v in &input[..n] {
        acc += v;
        prefix.push(acc);
    }

    let sum = match sum_of_values {
        Some(sum) => {
            debug_assert_eq!(sum, prefix[n - 1]);
            sum
        }
        None => {
            let sum = prefix[n - 1];
            TightVariableByte::encode_single(sum, out);
            sum
        }
    };

    let mut bw = BitWriter::new();
    bw.write_interpolative(&prefix[..n - 1], 0, sum);
    out.extend_from_slice(&bw.into_bytes());
}

/// Stateless decode; inverse of [`encode`]. Returns the unread tail.
pub(crate) fn decode<'a>(
    input: &'a [u8],
    out: &mut [u32],
    sum_of_values: Option<u32>,
    n: usize,
) -> &'a [u8] {
    debug_assert!(n >= 1 && n <= BLOCK_SIZE);
    let (sum, input) = match sum_of_values {
        Some(sum) => (sum, input),
        None => TightVariableByte::decode_single(input),
    };

    out[n - 1] = sum;
    let mut read = 0usize;
    if n > 1 {
        let mut br = BitReader::new(input);
        br.read_interpolative(&mut out[..n - 1], 0, sum);
        for i in (1..n).rev() {
            out[i] -= out[i - 1];
        }
        read = crate::bits::ceil_div(br.position(), 8);
    }
    &input[read..]
}

/// Interpolative block codec (`block_interpolative`).
pub struct InterpolativeBlockCodec;

impl BlockCodec for InterpolativeBlockCodec {
    fn name(&self) -> &'static str {
        "block_interpolative"
    }

    fn encode(&self, input: &[u32], sum_of_values: Option<u32>, n: usize, out: &mut Vec<u8>) {
        encode(input, sum_of_values, n, out);
    }

    fn decode<'a>(
        &self,
        input: &'a [u8],
        out: &mut [u32],
        sum_of_values: Option<u32>,
        n: usize,
    ) -> &'a [u8] {
        decode(input, out, sum_of_values, n)
    }
}
