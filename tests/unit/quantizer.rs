//! Linear quantiser contract, including the fixed endpoint values.

use talpa::{Error, LinearQuantizer};

#[test]
fn test_endpoints_at_8_bits() {
    let quantizer = LinearQuantizer::new(10.0, 8).unwrap();
    assert_eq!(quantizer.quantize(0.0).unwrap(), 1);
    assert_eq!(quantizer.quantize(10.0).unwrap(), 255);
    let mid = quantizer.quantize(5.0).unwrap();
    assert!((127..=129).contains(&mid), "midpoint was {}", mid);
}

#[test]
fn test_above_max_is_invalid_argument() {
    let quantizer = LinearQuantizer::new(10.0, 8).unwrap();
    assert!(matches!(
        quantizer.quantize(10.5),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn test_rounds_rather_than_truncates() {
    let quantizer = LinearQuantizer::new(255.0, 8).unwrap();
    // scale is (254 / 255); 200.0 maps to 200.2..., which must round to 199+1
    // rather than floor.
    let v = quantizer.quantize(200.0).unwrap();
    assert_eq!(v, (200.0f32 * (254.0 / 255.0)).round() as u32 + 1);
}

#[test]
fn test_sixteen_bit_range() {
    let quantizer = LinearQuantizer::new(1.0, 16).unwrap();
    assert_eq!(quantizer.range(), 65_535);
    assert_eq!(quantizer.quantize(1.0).unwrap(), 65_535);
    assert_eq!(quantizer.quantize(0.0).unwrap(), 1);
}
