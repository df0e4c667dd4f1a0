// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Varint-G8IU: groups of eight data bytes behind one descriptor byte.
//!
//! Stepanov, Gangolli, Rose, Ernst, Oberoi: "SIMD-based decoding of posting
//! lists", CIKM 2011. Descriptor bit i is set when data byte i completes an
//! integer. An integer never straddles two groups; when the next value does
//! not fit, the rest of the group is padding with clear descriptor bits, and
//! the decoder (which knows the block length) ignores it.

use super::{interpolative, BlockCodec, BLOCK_SIZE};

const GROUP_DATA_BYTES: usize = 8;

fn byte_len(val: u32) -> usize {
    match val {
        0..=0xFF => 1,
        0x100..=0xFFFF => 2,
        0x1_0000..=0xFF_FFFF => 3,
        _ => 4,
    }
}

/// Varint-G8IU block codec (`block_varintg8iu`).
pub struct VarintG8IUBlockCodec;

impl BlockCodec for VarintG8IUBlockCodec {
    fn name(&self) -> &'static str {
        "block_varintg8iu"
    }

    fn encode(&self, input: &[u32], sum_of_values: Option<u32>, n: usize, out: &mut Vec<u8>) {
        debug_assert!(n <= BLOCK_SIZE);
        if n < BLOCK_SIZE {
            interpolative::encode(input, sum_of_values, n, out);
            return;
        }
        let mut rest = &input[..n];
        while !rest.is_empty() {
            let desc_pos = out.len();
            out.push(0);
            let mut desc = 0u8;
            let mut used = 0usize;
            while let Some(&val) = rest.first() {
                let len = byte_len(val);
                if used + len > GROUP_DATA_BYTES {
                    break;
                }
                out.extend_from_slice(&val.to_le_bytes()[..len]);
                used += len;
                desc |= 1 << (used - 1);
                rest = &rest[1..];
            }
            out.resize(desc_pos + 1 + GROUP_DATA_BYTES, 0);
            out[desc_pos] = desc;
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
            let desc = rest[0];
            let data = &rest[1..=GROUP_DATA_BYTES];
            rest = &rest[1 + GROUP_DATA_BYTES..];
            let mut val = 0u32;
            let mut shift = 0u32;
            for (i, &byte) in data.iter().enumerate() {
                val |= u32::from(byte) << shift;
                shift += 8;
                if desc & (1 << i) != 0 {
                    out[decoded] = val;
                    decoded += 1;
                    val = 0;
                    shift = 0;
                    if decoded == n {
                        break;
                    }
                }
            }
        }
        rest
    }
}
