//! Codec edge cases: the block lengths a posting list actually produces,
//! including every short-tail size the interpolative fallback must cover.

use talpa::{block_codec_names, get_block_codec, BLOCK_SIZE};

fn roundtrip(codec_name: &str, values: &[u32], sum: Option<u32>) {
    let codec = get_block_codec(codec_name).unwrap();
    let mut buf = Vec::new();
    codec.encode(values, sum, values.len(), &mut buf);
    let mut out = vec![0u32; values.len()];
    let rest = codec.decode(&buf, &mut out, sum, values.len());
    assert!(rest.is_empty(), "{} left unread bytes", codec_name);
    assert_eq!(out, values, "{} mangled the block", codec_name);
}

#[test]
fn test_boundary_lengths_every_codec() {
    for name in block_codec_names() {
        for n in [1usize, 2, BLOCK_SIZE - 1, BLOCK_SIZE] {
            let values: Vec<u32> = (0..n as u32).map(|i| (i * 37 + 11) % 4096).collect();
            let sum: u32 = values.iter().sum();
            roundtrip(name, &values, Some(sum));
            roundtrip(name, &values, None);
        }
    }
}

#[test]
fn test_single_zero_every_codec() {
    for name in block_codec_names() {
        roundtrip(name, &[0], Some(0));
        roundtrip(name, &[0], None);
    }
}

#[test]
fn test_full_block_of_zeros_every_codec() {
    for name in block_codec_names() {
        let values = vec![0u32; BLOCK_SIZE];
        roundtrip(name, &values, Some(0));
        roundtrip(name, &values, None);
    }
}

#[test]
fn test_two_consecutive_blocks_stay_aligned() {
    // A decode must consume exactly its own codeword, or the next block
    // starts at garbage.
    for name in block_codec_names() {
        let codec = get_block_codec(name).unwrap();
        let a: Vec<u32> = (0..BLOCK_SIZE as u32).map(|i| i % 97).collect();
        let b: Vec<u32> = (0..17u32).collect();
        let b_sum: u32 = b.iter().sum();

        let mut buf = Vec::new();
        codec.encode(&a, None, BLOCK_SIZE, &mut buf);
        codec.encode(&b, Some(b_sum), b.len(), &mut buf);

        let mut out_a = vec![0u32; BLOCK_SIZE];
        let rest = codec.decode(&buf, &mut out_a, None, BLOCK_SIZE);
        let mut out_b = vec![0u32; b.len()];
        let rest = codec.decode(rest, &mut out_b, Some(b_sum), b.len());
        assert!(rest.is_empty(), "{}", name);
        assert_eq!(out_a, a, "{}", name);
        assert_eq!(out_b, b, "{}", name);
    }
}

#[test]
fn test_unknown_codec_name() {
    assert!(get_block_codec("block_made_up").is_err());
    assert!(get_block_codec("").is_err());
}
