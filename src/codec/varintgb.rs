// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! VarintGB (group varint): one key byte describes the byte lengths of the
//! next four integers.
//!
//! Jeffrey Dean: "Challenges in building large-scale information retrieval
//! systems", WSDM 2009 keynote. Two selector bits per value (length − 1)
//! remove the per-byte branch of classic varint. A trailing group of fewer
//! than four values reuses the same key byte with the surplus selector bits
//! unused.

use super::{interpolative, BlockCodec, BLOCK_SIZE};

fn append_value(val: u32, key: &mut u8, slot: u32, out: &mut Vec<u8>) {
    let bytes = val.to_le_bytes();
    let len = if val < 1 << 8 {
        0u8
    } else if val < 1 << 16 {
        1
    } else if val < 1 << 24 {
        2
    } else {
        3
    };
    *key |= len << (slot * 2);
    out.extend_from_slice(&bytes[..=len as usize]);
}

pub(crate) fn encode_array(values: &[u32], out: &mut Vec<u8>) {
    for group in values.chunks(4) {
        let key_pos = out.len();
        out.push(0);
        let mut key = 0u8;
        for (slot, &val) in group.iter().enumerate() {
            append_value(val, &mut key, slot as u32, out);
        }
        out[key_pos] = key;
    }
}

pub(crate) fn decode_array<'a>(mut input: &'a [u8], out: &mut [u32]) -> &'a [u8] {
    for group in out.chunks_mut(4) {
        let mut key = input[0];
        input = &input[1..];
        for v in group.iter_mut() {
            let len = (key & 3) as usize + 1;
            key >>= 2;
            let mut val = 0u32;
            for (i, &byte) in input[..len].iter().enumerate() {
                val |= u32::from(byte) << (8 * i as u32);
            }
            *v = val;
            input = &input[len..];
        }
    }
    input
}

/// VarintGB block codec (`block_varintgb`).
pub struct VarintGbBlockCodec;

impl BlockCodec for VarintGbBlockCodec {
    fn name(&self) -> &'static str {
        "block_varintgb"
    }

    fn encode(&self, input: &[u32], sum_of_values: Option<u32>, n: usize, out: &mut Vec<u8>) {
        debug_assert!(n <= BLOCK_SIZE);
        if n < BLOCK_SIZE {
            interpolative::encode(input, sum_of_values, n, out);
            return;
        }
        encode_array(&input[..n], out);
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
        decode_array(input, &mut out[..n])
    }
}
