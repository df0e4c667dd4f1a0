//! Quantiser properties: order preservation and endpoint behaviour.

use proptest::prelude::*;
use talpa::LinearQuantizer;

proptest! {
    #[test]
    fn prop_monotone(max in 0.5f32..1000.0, a in 0.0f32..1.0, b in 0.0f32..1.0) {
        let quantizer = LinearQuantizer::new(max, 8).unwrap();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let qlo = quantizer.quantize(lo * max).unwrap();
        let qhi = quantizer.quantize(hi * max).unwrap();
        prop_assert!(qlo <= qhi);
    }

    #[test]
    fn prop_output_range(max in 0.5f32..1000.0, v in 0.0f32..1.0, bits in 2u8..=16) {
        let quantizer = LinearQuantizer::new(max, bits).unwrap();
        let q = quantizer.quantize(v * max).unwrap();
        prop_assert!(q >= 1);
        prop_assert!(q <= quantizer.range());
    }

    #[test]
    fn prop_rejects_outside(max in 0.5f32..1000.0, excess in 0.001f32..10.0) {
        let quantizer = LinearQuantizer::new(max, 8).unwrap();
        prop_assert!(quantizer.quantize(max + excess).is_err());
        prop_assert!(quantizer.quantize(-excess).is_err());
    }
}
