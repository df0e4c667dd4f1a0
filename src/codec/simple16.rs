// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Simple16: 32-bit words, 4-bit selector, 28 data bits.
//!
//! Zhang, Long, Suel: "Performance of compressed inverted list caching in
//! search engines", WWW 2008. Unlike Simple8b the selectors may mix widths
//! within one word, which buys finer granularity at small widths. The
//! largest representable value is 2^28 − 1; document gaps and frequencies
//! stay far below that in practice.

use crate::bits::read_u32_le;

use super::{interpolative, BlockCodec, BLOCK_SIZE};

/// Per-selector slot layout: (count, width) runs summing to 28 bits.
const CONFIGS: [&[(usize, u32)]; 16] = [
    &[(28, 1)],
    &[(7, 2), (14, 1)],
    &[(7, 1), (7, 2), (7, 1)],
    &[(14, 1), (7, 2)],
    &[(14, 2)],
    &[(1, 4), (8, 3)],
    &[(1, 3), (4, 4), (3, 3)],
    &[(7, 4)],
    &[(4, 5), (2, 4)],
    &[(2, 4), (4, 5)],
    &[(3, 6), (2, 5)],
    &[(2, 5), (3, 6)],
    &[(4, 7)],
    &[(1, 10), (2, 9)],
    &[(2, 14)],
    &[(1, 28)],
];

fn config_fits(config: &[(usize, u32)], values: &[u32]) -> Option<usize> {
    let mut taken = 0usize;
    for &(count, width) in config {
        for _ in 0..count {
            if taken == values.len() {
                return Some(taken);
            }
            if values[taken] >= (1u32 << width) {
                return None;
            }
            taken += 1;
        }
    }
    Some(taken)
}

/// Simple16 block codec (`block_simple16`).
pub struct Simple16BlockCodec;

impl BlockCodec for Simple16BlockCodec {
    fn name(&self) -> &'static str {
        "block_simple16"
    }

    fn encode(&self, input: &[u32], sum_of_values: Option<u32>, n: usize, out: &mut Vec<u8>) {
        debug_assert!(n <= BLOCK_SIZE);
        if n < BLOCK_SIZE {
            interpolative::encode(input, sum_of_values, n, out);
            return;
        }
        let mut rest = &input[..n];
        debug_assert!(rest.iter().all(|&v| v < (1 << 28)), "simple16 value overflow");
        while !rest.is_empty() {
            let (selector, taken) = CONFIGS
                .iter()
                .enumerate()
                .find_map(|(s, config)| config_fits(config, rest).map(|taken| (s, taken)))
                .expect("selector 15 fits any in-range value");

            let mut word = (selector as u32) << 28;
            let mut shift = 0u32;
            let mut i = 0usize;
            for &(count, width) in CONFIGS[selector] {
                for _ in 0..count {
                    if i < taken {
                        word |= rest[i] << shift;
                        i += 1;
                    }
                    shift += width;
                }
            }
            out.extend_from_slice(&word.to_le_bytes());
            rest = &rest[taken..];
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
            let word = read_u32_le(rest);
            rest = &rest[4..];
            let selector = (word >> 28) as usize;
            let mut shift = 0u32;
            for &(count, width) in CONFIGS[selector] {
                let mask = (1u32 << width) - 1;
                for _ in 0..count {
                    if decoded == n {
                        break;
                    }
                    out[decoded] = (word >> shift) & mask;
                    decoded += 1;
                    shift += width;
                }
            }
        }
        rest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(values: &[u32]) {
        let codec = Simple16BlockCodec;
        let mut buf = Vec::new();
        codec.encode(values, None, values.len(), &mut buf);
        let mut out = vec![0u32; values.len()];
        let rest = codec.decode(&buf, &mut out, None, values.len());
        assert!(rest.is_empty());
        assert_eq!(out, values);
    }

    #[test]
    fn test_binary_block_packs_densely() {
        let codec = Simple16BlockCodec;
        let values: Vec<u32> = (0..BLOCK_SIZE as u32).map(|i| i % 2).collect();
        let mut buf = Vec::new();
        codec.encode(&values, None, BLOCK_SIZE, &mut buf);
        // 128 one-bit values at 28 per word: 5 words.
        assert_eq!(buf.len(), 20);
        roundtrip(&values);
    }

    #[test]
    fn test_mixed_widths() {
        let values: Vec<u32> = (0..BLOCK_SIZE as u32)
            .map(|i| i.wrapping_mul(2_654_435_761).wrapping_add(i) % (1 << 20))
            .collect();
        roundtrip(&values);
    }

    #[test]
    fn test_largest_representable() {
        let values = vec![(1u32 << 28) - 1; BLOCK_SIZE];
        roundtrip(&values);
    }
}
