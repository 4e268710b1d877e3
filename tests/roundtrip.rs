//! Integration tests for text conversion round-trips.
//!
//! Parsing a rendered value back in the same base must reproduce the value
//! exactly, for integers across the full 2..=62 base range and for floats
//! when the render carries enough digits.

use mpnum::prelude::*;

#[test]
fn test_integer_roundtrip_across_bases() -> Result<()> {
    let cases = [
        "0",
        "1",
        "-1",
        "26",
        "123456789",
        "-340282366920938463463374607431768211456",
    ];
    for src in cases {
        let n = Integer::from_str_radix(src, 10)?;
        for base in [2, 3, 8, 10, 16, 36, 37, 45, 62] {
            let rendered = n.to_string_radix(base, FormatOptions::empty())?;
            let back = Integer::from_str_radix(&rendered, base)?;
            assert_eq!(back, n, "base {base} round-trip of {src}");
        }
    }
    Ok(())
}

#[test]
fn test_integer_base_zero_prefix_detection() -> Result<()> {
    assert_eq!(Integer::from_str_radix("0x1A", 0)?, Integer::from(26));
    assert_eq!(Integer::from_str_radix("0b101", 0)?, Integer::from(5));
    assert_eq!(Integer::from_str_radix("0o17", 0)?, Integer::from(15));
    assert_eq!(Integer::from_str_radix("-0x10", 0)?, Integer::from(-16));
    assert_eq!(Integer::from_str_radix("42", 0)?, Integer::from(42));
    Ok(())
}

#[test]
fn test_integer_prefixed_render_reparses() -> Result<()> {
    let n = Integer::from(26);
    let rendered = n.to_string_radix(16, FormatOptions::PREFIX)?;
    assert_eq!(rendered, "0x1a");
    assert_eq!(Integer::from_str_radix(&rendered, 0)?, n);
    Ok(())
}

#[test]
fn test_negative_base_renders_uppercase() -> Result<()> {
    let n = Integer::from(26);
    assert_eq!(n.to_string_radix(-16, FormatOptions::empty())?, "1A");
    assert_eq!(n.to_string_radix(16, FormatOptions::empty())?, "1a");
    Ok(())
}

#[test]
fn test_invalid_bases_rejected() {
    let n = Integer::from(1);
    assert!(matches!(
        n.to_string_radix(63, FormatOptions::empty()),
        Err(Error::InvalidBase { base: 63 })
    ));
    assert!(matches!(
        n.to_string_radix(1, FormatOptions::empty()),
        Err(Error::InvalidBase { base: 1 })
    ));
    // negative uppercase rendering stops at 36
    assert!(matches!(
        n.to_string_radix(-62, FormatOptions::empty()),
        Err(Error::InvalidBase { base: -62 })
    ));
    assert!(Integer::from_str_radix("10", 1).is_err());
    assert!(Integer::from_str_radix("10", 63).is_err());
}

#[test]
fn test_malformed_text_rejected() {
    assert!(matches!(
        Integer::from_str_radix("12\u{0}34", 10),
        Err(Error::EmbeddedNul)
    ));
    assert!(matches!(
        Integer::from_str_radix("12é", 10),
        Err(Error::NonAscii)
    ));
    assert!(matches!(
        Integer::from_str_radix("12z", 10),
        Err(Error::ParseNumber { .. })
    ));
}

/// A value that survived the context's precision renders and reparses to the
/// identical float, even when the original exact value did not fit.
#[test]
fn test_float_render_reparse_identity() -> Result<()> {
    let ctx = Context::new();
    // 2^100 + 1 does not fit in 53 bits; the stored value is the rounded one
    let big = Integer::from_str_radix("1267650600228229401496703205377", 10)?;
    let x = Real::from_integer(&ctx, Prec::Context, &big)?;
    assert_ne!(x.rc(), std::cmp::Ordering::Equal);

    let rendered = x.to_string_radix(10, None, FormatOptions::empty())?;
    let back = Real::from_str_radix(&ctx, Prec::Bits(x.prec()), &rendered, 10)?;
    assert_eq!(back.as_rug(), x.as_rug());
    Ok(())
}

#[test]
fn test_float_digit_extraction_full_base_range() -> Result<()> {
    let ctx = Context::new();
    let x = Real::from_f64(&ctx, Prec::Natural, 0.5)?;
    for base in [2, 10, 36, 62] {
        let (digits, exp) = x.digits(base)?;
        assert!(!digits.is_empty(), "base {base}");
        assert_eq!(exp, 0, "0.5 has exponent 0 in base {base}");
    }
    // specials render as words
    let nan = Real::from_str_radix(&ctx, Prec::Context, "nan", 10)?;
    assert_eq!(nan.digits(10)?.0, "nan");
    Ok(())
}

#[test]
fn test_rational_from_decimal_text_is_exact() -> Result<()> {
    let r = Rational::from_decimal_str("0.1")?;
    assert_eq!(r.numer(), Integer::from(1));
    assert_eq!(r.denom(), Integer::from(10));

    let r = Rational::from_str("-3/6")?;
    assert_eq!(r.numer(), Integer::from(-1));
    assert_eq!(r.denom(), Integer::from(2));
    Ok(())
}

#[test]
fn test_tagged_rendering() -> Result<()> {
    let n = Integer::from(26);
    assert_eq!(n.to_string_radix(10, FormatOptions::TAG)?, "integer(26)");

    let r = Rational::from_pair(Integer::from(1), Integer::from(2))?;
    assert_eq!(r.to_string_radix(10, FormatOptions::TAG)?, "rational(1/2)");
    Ok(())
}
