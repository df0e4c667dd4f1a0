// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Tight variable-byte coding: 7 data bits per byte, terminator bit on the
//! last byte of each integer.
//!
//! This is the "tight" flavor where the high bit marks the *final* byte, so
//! single-byte values (the common case for gaps) decode with one branch.
//! It doubles as the primitive for the list-length prefix of every posting
//! list and the length prefix inside the QMX stream.

use super::{interpolative, BlockCodec, BLOCK_SIZE};

/// Byte-at-a-time variable-byte primitives.
pub struct TightVariableByte;

impl TightVariableByte {
    /// Append the encoding of a single value.
    pub fn encode_single(mut val: u32, out: &mut Vec<u8>) {
        while val >= 128 {
            out.push((val & 0x7F) as u8);
            val >>= 7;
        }
        out.push((val as u8) | 0x80);
    }

    /// Decode `out.len()` values, returning the unread tail.
    pub fn decode<'a>(mut input: &'a [u8], out: &mut [u32]) -> &'a [u8] {
        for v in out.iter_mut() {
            let mut val: u32 = 0;
            let mut shift: u32 = 0;
            loop {
                let byte = input[0];
                input = &input[1..];
                val |= u32::from(byte & 0x7F) << shift;
                if byte & 0x80 != 0 {
                    break;
                }
                shift += 7;
            }
            *v = val;
        }
        input
    }

    /// Decode one value, returning it together with the unread tail.
    pub fn decode_single(input: &[u8]) -> (u32, &[u8]) {
        let mut out = [0u32; 1];
        let rest = Self::decode(input, &mut out);
        (out[0], rest)
    }
}

/// Variable-byte block codec (`block_varint`).
pub struct VarintBlockCodec;

impl BlockCodec for VarintBlockCodec {
    fn name(&self) -> &'static str {
        "block_varint"
    }

    fn encode(&self, input: &[u32], sum_of_values: Option<u32>, n: usize, out: &mut Vec<u8>) {
        debug_assert!(n <= BLOCK_SIZE);
        if n < BLOCK_SIZE {
            interpolative::encode(input, sum_of_values, n, out);
            return;
        }
        for &v in &input[..n] {
            TightVariableByte::encode_single(v, out);
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
        TightVariableByte::decode(input, &mut out[..n])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_roundtrip() {
        for val in [0u32, 1, 127, 128, 16383, 16384, u32::MAX] {
            let mut buf = Vec::new();
            TightVariableByte::encode_single(val, &mut buf);
            let (decoded, rest) = TightVariableByte::decode_single(&buf);
            assert_eq!(decoded, val);
            assert!(rest.is_empty());
        }
    }

    #[test]
    fn test_terminator_bit_is_on_last_byte() {
        let mut buf = Vec::new();
        TightVariableByte::encode_single(300, &mut buf);
        assert_eq!(buf.len(), 2);
        assert_eq!(buf[0] & 0x80, 0);
        assert_ne!(buf[1] & 0x80, 0);
    }

    #[test]
    fn test_full_block_roundtrip() {
        let codec = VarintBlockCodec;
        let values: Vec<u32> = (0..BLOCK_SIZE as u32).map(|i| i * 37 % 4096).collect();
        let mut buf = Vec::new();
        codec.encode(&values, None, BLOCK_SIZE, &mut buf);
        let mut out = vec![0u32; BLOCK_SIZE];
        let rest = codec.decode(&buf, &mut out, None, BLOCK_SIZE);
        assert!(rest.is_empty());
        assert_eq!(out, values);
    }
}
