// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Simple8b: 64-bit words with a 4-bit selector and 60 data bits.
//!
//! Anh & Moffat: "Index compression using 64-bit words", Softw. Pract.
//! Exper. 40(2), 2010. Each selector fixes a (count, width) pair; the two
//! zero-width selectors encode long runs of zeros with no payload. The
//! decoder knows the block length, so a word may describe more values than
//! the block has left and the surplus slots are simply ignored.

use crate::bits::read_u64_le;

use super::{interpolative, BlockCodec, BLOCK_SIZE};

/// (values per word, bits per value), indexed by selector.
const SELECTORS: [(usize, u32); 16] = [
    (240, 0),
    (120, 0),
    (60, 1),
    (30, 2),
    (20, 3),
    (15, 4),
    (12, 5),
    (10, 6),
    (8, 7),
    (7, 8),
    (6, 10),
    (5, 12),
    (4, 15),
    (3, 20),
    (2, 30),
    (1, 60),
];

fn fits(values: &[u32], width: u32) -> bool {
    if width == 0 {
        return values.iter().all(|&v| v == 0);
    }
    if width >= 32 {
        return true;
    }
    values.iter().all(|&v| v < (1u32 << width))
}

/// Simple8b block codec (`block_simple8b`).
pub struct Simple8bBlockCodec;

impl BlockCodec for Simple8bBlockCodec {
    fn name(&self) -> &'static str {
        "block_simple8b"
    }

    fn encode(&self, input: &[u32], sum_of_values: Option<u32>, n: usize, out: &mut Vec<u8>) {
        debug_assert!(n <= BLOCK_SIZE);
        if n < BLOCK_SIZE {
            interpolative::encode(input, sum_of_values, n, out);
            return;
        }
        let mut rest = &input[..n];
        while !rest.is_empty() {
            // First selector that fits packs the most values.
            let (selector, &(count, width)) = SELECTORS
                .iter()
                .enumerate()
                .find(|(_, &(count, width))| fits(&rest[..count.min(rest.len())], width))
                .expect("selector 15 always fits");

            let take = count.min(rest.len());
            let mut word = (selector as u64) << 60;
            for (i, &v) in rest[..take].iter().enumerate() {
                word |= u64::from(v) << (i as u32 * width);
            }
            out.extend_from_slice(&word.to_le_bytes());
            rest = &rest[take..];
        }
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
        let mut rest = input;
        let mut decoded = 0usize;
        while decoded < n {
            let word = read_u64_le(rest);
            rest = &rest[8..];
            let (count, width) = SELECTORS[(word >> 60) as usize];
            let take = count.min(n - decoded);
            if width == 0 {
                out[decoded..decoded + take].fill(0);
            } else {
                let mask = (1u64 << width) - 1;
                for i in 0..take {
                    out[decoded + i] = ((word >> (i as u32 * width)) & mask) as u32;
                }
            }
            decoded += take;
        }
        rest
    }
}
