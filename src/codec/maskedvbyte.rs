// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! MaskedVByte: classic continuation-bit varint, decoded wholesale.
//!
//! Plaisance, Kurz, Lemire: "Vectorized VByte decoding", 2015. The wire
//! format is plain VByte with the high bit meaning "more bytes follow"; the
//! masked part of the name refers to the SIMD decoding trick, which needs no
//! cooperation from the encoder. The scalar decoder here reads the identical
//! stream.

use super::{interpolative, BlockCodec, BLOCK_SIZE};

pub(crate) fn vbyte_encode(values: &[u32], out: &mut Vec<u8>) {
    for &v in values {
        let mut val = v;
        while val >= 128 {
            out.push((val as u8) | 0x80);
            val >>= 7;
        }
        out.push(val as u8);
    }
}

pub(crate) fn vbyte_decode<'a>(mut input: &'a [u8], out: &mut [u32]) -> &'a [u8] {
    for v in out.iter_mut() {
        let mut val = 0u32;
        let mut shift = 0u32;
        loop {
            let byte = input[0];
            input = &input[1..];
            val |= u32::from(byte & 0x7F) << shift;
            if byte & 0x80 == 0 {
                break;
            }
            shift += 7;
        }
        *v = val;
    }
    input
}

/// MaskedVByte block codec (`block_maskedvbyte`).
pub struct MaskedVByteBlockCodec;

impl BlockCodec for MaskedVByteBlockCodec {
    fn name(&self) -> &'static str {
        "block_maskedvbyte"
    }

    fn encode(&self, input: &[u32], sum_of_values: Option<u32>, n: usize, out: &mut Vec<u8>) {
        debug_assert!(n <= BLOCK_SIZE);
        if n < BLOCK_SIZE {
            interpolative::encode(input, sum_of_values, n, out);
            return;
        }
        vbyte_encode(&input[..n], out);
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
        vbyte_decode(input, &mut out[..n])
    }
}
