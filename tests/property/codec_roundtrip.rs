//! Round-trip exactness for every codec in the registry.

use proptest::prelude::*;
use talpa::{block_codec_names, get_block_codec, BLOCK_SIZE};

fn block_values(n: usize) -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(1u32..(1 << 12), n)
}

fn any_block_len() -> impl Strategy<Value = usize> {
    prop_oneof![
        Just(1usize),
        Just(2usize),
        Just(BLOCK_SIZE - 1),
        Just(BLOCK_SIZE),
        3..BLOCK_SIZE,
    ]
}

proptest! {
    #[test]
    fn prop_roundtrip_unknown_sum(
        n in any_block_len(),
        seed in any::<u32>(),
    ) {
        let values: Vec<u32> = (0..n as u32)
            .map(|i| 1 + (seed.wrapping_mul(i.wrapping_add(7)) % ((1 << 12) - 1)))
            .collect();
        for name in block_codec_names() {
            let codec = get_block_codec(name).unwrap();
            let mut buf = Vec::new();
            codec.encode(&values, None, n, &mut buf);
            let mut out = vec![0u32; n];
            let rest = codec.decode(&buf, &mut out, None, n);
            prop_assert!(rest.is_empty(), "{}", name);
            prop_assert_eq!(&out, &values, "{}", name);
        }
    }

    #[test]
    fn prop_roundtrip_known_sum(values in block_values(BLOCK_SIZE)) {
        let sum: u32 = values.iter().sum();
        for name in block_codec_names() {
            let codec = get_block_codec(name).unwrap();
            let mut buf = Vec::new();
            codec.encode(&values, Some(sum), BLOCK_SIZE, &mut buf);
            let mut out = vec![0u32; BLOCK_SIZE];
            let rest = codec.decode(&buf, &mut out, Some(sum), BLOCK_SIZE);
            prop_assert!(rest.is_empty(), "{}", name);
            prop_assert_eq!(&out, &values, "{}", name);
        }
    }

    #[test]
    fn prop_short_tail_roundtrip(values in block_values(BLOCK_SIZE - 1)) {
        // Every codec must route n < BLOCK_SIZE through interpolative; the
        // streams of two different codecs are therefore identical.
        let sum: u32 = values.iter().sum();
        let n = values.len();
        let reference = {
            let codec = get_block_codec("block_interpolative").unwrap();
            let mut buf = Vec::new();
            codec.encode(&values, Some(sum), n, &mut buf);
            buf
        };
        for name in block_codec_names() {
            let codec = get_block_codec(name).unwrap();
            let mut buf = Vec::new();
            codec.encode(&values, Some(sum), n, &mut buf);
            prop_assert_eq!(&buf, &reference, "{} diverged on a short tail", name);
        }
    }
}
