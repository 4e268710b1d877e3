//! Integration tests for the condition machinery: sticky flags, traps,
//! exponent-bound enforcement, and gradual underflow.

use mpnum::prelude::*;

#[test]
fn test_flags_are_sticky_until_cleared() -> Result<()> {
    let ctx = Context::new();
    let _ = ctx.div(1, 0)?;
    assert!(ctx.test(Flags::DIVIDE_BY_ZERO));

    // an exact follow-up operation does not clear the earlier flag
    let _ = ctx.add(1.0, 2.0)?;
    assert!(ctx.test(Flags::DIVIDE_BY_ZERO));

    ctx.clear_flags();
    assert!(!ctx.test(Flags::DIVIDE_BY_ZERO));
    Ok(())
}

#[test]
fn test_untrapped_division_by_zero_yields_signed_infinity() -> Result<()> {
    let ctx = Context::new();

    let pos = ctx.div(1, 0)?;
    let pos = pos.as_real().unwrap();
    assert!(pos.is_infinite() && !pos.is_sign_negative());

    let neg = ctx.div(-1, 0)?;
    let neg = neg.as_real().unwrap();
    assert!(neg.is_infinite() && neg.is_sign_negative());
    assert!(ctx.test(Flags::DIVIDE_BY_ZERO));
    Ok(())
}

#[test]
fn test_trapped_condition_is_an_error_with_no_result() {
    let mut ctx = Context::new();
    ctx.set_traps(Flags::DIVIDE_BY_ZERO);
    let err = ctx.div(1, 0).unwrap_err();
    assert!(matches!(err, Error::DivisionByZero(_)));
    // the flag is recorded even though the operation trapped
    assert!(ctx.test(Flags::DIVIDE_BY_ZERO));
}

#[test]
fn test_inexact_trap() -> Result<()> {
    let mut ctx = Context::new();
    ctx.set_traps(Flags::INEXACT);

    // 1/3 cannot be represented: traps
    assert!(matches!(ctx.div(1, 3), Err(Error::Inexact(_))));

    // 1/2 is exact: no trap
    let r = ctx.div(1, 2)?;
    assert_eq!(r.as_real().unwrap().rc(), std::cmp::Ordering::Equal);
    Ok(())
}

#[test]
fn test_invalid_operation_flag_and_trap() -> Result<()> {
    let mut ctx = Context::new();
    ctx.set_allow_complex(false);

    let r = ctx.sqrt(-1)?;
    assert!(r.as_real().unwrap().is_nan());
    assert!(ctx.test(Flags::INVALID));

    ctx.set_traps(Flags::INVALID);
    assert!(matches!(ctx.sqrt(-1), Err(Error::InvalidOperation(_))));
    Ok(())
}

#[test]
fn test_overflow_against_narrow_exponent_bounds() -> Result<()> {
    let mut ctx = Context::new();
    ctx.set_emax(10)?;

    // 2^9 * 2^9 = 2^18 exceeds emax = 10
    let big = Real::from_f64(&ctx, Prec::Context, 512.0)?;
    let r = ctx.mul(Value::Real(big.clone()), Value::Real(big))?;
    assert!(r.as_real().unwrap().is_infinite());
    assert!(ctx.test(Flags::OVERFLOW));
    assert!(ctx.test(Flags::INEXACT), "overflow substitution is inexact");
    Ok(())
}

#[test]
fn test_underflow_against_narrow_exponent_bounds() -> Result<()> {
    let mut ctx = Context::new();
    ctx.set_emin(-10)?;

    let tiny = Real::from_f64(&ctx, Prec::Context, 1.0 / 512.0)?;
    let r = ctx.mul(Value::Real(tiny.clone()), Value::Real(tiny))?;
    assert!(r.as_real().unwrap().is_zero());
    assert!(ctx.test(Flags::UNDERFLOW));
    Ok(())
}

#[test]
fn test_ieee_binary64_context_subnormals() -> Result<()> {
    let ctx = Context::ieee_binary64()?;

    // the smallest binary64 subnormal is representable under this context
    let denorm_min = f64::from_bits(1);
    let x = Real::from_f64(&ctx, Prec::Context, denorm_min)?;
    assert!(!x.is_zero());
    assert_eq!(x.to_f64_exact()?, denorm_min);

    // halving it rounds to zero and underflows
    let r = ctx.div(Value::Real(x), 2)?;
    assert!(r.as_real().unwrap().is_zero());
    assert!(ctx.test(Flags::UNDERFLOW));
    Ok(())
}

#[test]
fn test_trap_priority_underflow_before_inexact() {
    let mut ctx = Context::new();
    ctx.set_emin(-10).unwrap();
    ctx.set_traps(Flags::UNDERFLOW | Flags::INEXACT);

    let tiny = Real::from_f64(&Context::new(), Prec::Context, 1.0 / 512.0).unwrap();
    let err = ctx
        .mul(Value::Real(tiny.clone()), Value::Real(tiny))
        .unwrap_err();
    // both conditions arise; underflow outranks inexact
    assert!(matches!(err, Error::Underflow(_)));
}

#[test]
fn test_complex_component_conditions() -> Result<()> {
    let mut ctx = Context::new();
    ctx.set_real_prec(Some(80))?;
    ctx.set_imag_prec(Some(40))?;

    // the imaginary part cannot hold a 53-bit double exactly
    let z = Complex::from_f64_pair(&ctx, Prec::Context, (1.0, 1.0 / 3.0))?;
    assert_eq!(z.rc().0, std::cmp::Ordering::Equal);
    assert_ne!(z.rc().1, std::cmp::Ordering::Equal);
    assert!(ctx.test(Flags::INEXACT));

    ctx.clear_flags();
    ctx.set_traps(Flags::INEXACT);
    assert!(Complex::from_f64_pair(&ctx, Prec::Context, (1.0, 1.0 / 3.0)).is_err());
    Ok(())
}

#[test]
fn test_flags_do_not_leak_between_contexts() -> Result<()> {
    let a = Context::new();
    let b = Context::new();
    let _ = a.div(1, 0)?;
    assert!(a.test(Flags::DIVIDE_BY_ZERO));
    assert!(!b.test(Flags::DIVIDE_BY_ZERO));
    Ok(())
}
