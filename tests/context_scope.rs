//! Integration tests for the thread-local active context: activation,
//! scoped restoration, and isolation between threads.

use mpnum::prelude::*;

#[test]
fn test_default_active_context() -> Result<()> {
    let r = mpnum::add(1.0, 2.0)?;
    assert_eq!(r.as_real().unwrap().prec(), 53);
    Ok(())
}

#[test]
fn test_activation_scopes_nest_and_restore() -> Result<()> {
    let mut outer = Context::new();
    outer.set_precision(100)?;
    {
        let _outer_guard = outer.activate();
        assert_eq!(mpnum::add(1, 0.5)?.as_real().unwrap().prec(), 100);

        let mut inner = Context::new();
        inner.set_precision(24)?;
        {
            let _inner_guard = inner.activate();
            assert_eq!(mpnum::add(1, 0.5)?.as_real().unwrap().prec(), 24);
        }

        // inner guard dropped: outer settings are back
        assert_eq!(mpnum::add(1, 0.5)?.as_real().unwrap().prec(), 100);
    }
    assert_eq!(mpnum::add(1, 0.5)?.as_real().unwrap().prec(), 53);
    Ok(())
}

#[test]
fn test_guard_restores_on_panic() {
    let result = std::panic::catch_unwind(|| {
        let mut ctx = Context::new();
        ctx.set_precision(24).unwrap();
        let _guard = ctx.activate();
        panic!("boom");
    });
    assert!(result.is_err());
    assert_eq!(
        mpnum::add(1, 0.5).unwrap().as_real().unwrap().prec(),
        53,
        "default context restored after panic"
    );
}

#[test]
fn test_flags_accumulate_in_active_context() -> Result<()> {
    let ctx = Context::new();
    let _guard = ctx.activate();
    let _ = mpnum::div(1, 0)?;
    let _ = mpnum::div(1, 3)?;
    assert!(with_active(|active| {
        active.test(Flags::DIVIDE_BY_ZERO) && active.test(Flags::INEXACT)
    }));
    Ok(())
}

#[test]
fn test_threads_do_not_share_the_active_context() -> Result<()> {
    let mut ctx = Context::new();
    ctx.set_precision(200)?;
    let _guard = ctx.activate();

    let child_prec = std::thread::spawn(|| {
        mpnum::add(1, 0.5)
            .map(|v| v.as_real().map(Real::prec))
            .ok()
            .flatten()
    })
    .join()
    .map_err(|_| Error::Value {
        message: "worker panicked".to_string(),
    })?;

    assert_eq!(child_prec, Some(53), "child thread sees the default");
    assert_eq!(mpnum::add(1, 0.5)?.as_real().unwrap().prec(), 200);
    Ok(())
}

#[test]
fn test_set_active_replaces_without_scope() -> Result<()> {
    let previous = active();
    assert_eq!(previous.precision(), 53);

    let mut ctx = Context::new();
    ctx.set_precision(64)?;
    set_active(ctx);
    assert_eq!(mpnum::add(1, 0.5)?.as_real().unwrap().prec(), 64);
    // put the default back so later tests on this thread are unaffected
    set_active(previous);
    Ok(())
}

#[test]
fn test_explicit_context_ignores_the_active_one() -> Result<()> {
    let mut active_ctx = Context::new();
    active_ctx.set_precision(24)?;
    let _guard = active_ctx.activate();

    let mut explicit = Context::new();
    explicit.set_precision(80)?;
    let r = explicit.add(1, 0.5)?;
    assert_eq!(r.as_real().unwrap().prec(), 80);

    // conditions land in the context that ran the operation
    let _ = explicit.div(1, 0)?;
    assert!(explicit.test(Flags::DIVIDE_BY_ZERO));
    assert!(!with_active(|a| a.test(Flags::DIVIDE_BY_ZERO)));
    Ok(())
}
