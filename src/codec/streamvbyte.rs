// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! StreamVByte: control bytes and data bytes in two separate streams.
//!
//! Lemire, Kurz, Rupp: "Stream VByte: faster byte-oriented integer
//! compression", Inf. Process. Lett. 130, 2018. All control bytes (two bits
//! per value: byte length − 1) come first, then the data bytes back to back.
//! Splitting the streams is what lets the SIMD variant shuffle 16 data bytes
//! at a time; the layout is kept here so the files stay compatible with that
//! style of decoder.

use super::{interpolative, BlockCodec, BLOCK_SIZE};

fn byte_len(val: u32) -> usize {
    match val {
        0..=0xFF => 1,
        0x100..=0xFFFF => 2,
        0x1_0000..=0xFF_FFFF => 3,
        _ => 4,
    }
}

/// StreamVByte block codec (`block_streamvbyte`).
pub struct StreamVByteBlockCodec;

impl BlockCodec for StreamVByteBlockCodec {
    fn name(&self) -> &'static str {
        "block_streamvbyte"
    }

    fn encode(&self, input: &[u32], sum_of_values: Option<u32>, n: usize, out: &mut Vec<u8>) {
        debug_assert!(n <= BLOCK_SIZE);
        if n < BLOCK_SIZE {
            interpolative::encode(input, sum_of_values, n, out);
            return;
        }
        let input = &input[..n];
        let control_len = crate::bits::ceil_div(n, 4);
        let control_start = out.len();
        out.resize(control_start + control_len, 0);
        for (i, &val) in input.iter().enumerate() {
            let len = byte_len(val);
            out[control_start + i / 4] |= ((len - 1) as u8) << ((i % 4) * 2);
            let data = val.to_le_bytes();
            out.extend_from_slice(&data[..len]);
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
        let control_len = crate::bits::ceil_div(n, 4);
        let (control, mut data) = input.split_at(control_len);
        for (i, v) in out[..n].iter_mut().enumerate() {
            let len = ((control[i / 4] >> ((i % 4) * 2)) & 3) as usize + 1;
            let mut val = 0u32;
            for (b, &byte) in data[..len].iter().enumerate() {
                val |= u32::from(byte) << (8 * b as u32);
            }
            *v = val;
            data = &data[len..];
        }
        data
    }
}
