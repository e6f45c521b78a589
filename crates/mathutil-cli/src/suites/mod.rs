//! Demo suites over `MathUtil`
//!
//! Both suites keep their `MathUtil` in an `Option` slot that per-case setup
//! fills and per-case teardown clears, so every case starts from a fresh
//! instance.

mod math_util_test1;

use mathutil_core::{ArithError, MathUtil};
use mathutil_harness::{assert_err, assume_true, fail, Condition, Failure, Os, Suite, TestCase, TestPlan};
use semver::Version;

/// Fixture shared by the demo suites
pub type Slot = Option<MathUtil>;

/// Every demo suite, in registration order
pub fn plan() -> TestPlan {
    let mut plan = TestPlan::new();
    plan.register(math_util_test::suite());
    plan.register(math_util_test1::suite());
    plan
}

/// The instance per-case setup stored in the slot.
pub(crate) fn math(slot: &Slot) -> Result<MathUtil, Failure> {
    match slot {
        Some(math) => Ok(*math),
        None => fail("MathUtil was not initialized"),
    }
}

/// Fixture factory that logs every construction.
pub(crate) fn instance(suite: &'static str) -> impl Fn() -> Slot + Send + Sync + 'static {
    move || {
        tracing::info!(suite, "0 - param constr");
        None
    }
}

/// One-time and per-case hooks common to both suites.
pub(crate) fn with_math_hooks(suite: Suite<Slot>) -> Suite<Slot> {
    let name = suite.name().to_string();
    let (setup, teardown, before, after) = (name.clone(), name.clone(), name.clone(), name);
    suite
        .before_all(move || {
            tracing::info!(suite = %setup, "BeforeAll");
            Ok(())
        })
        .after_all(move || {
            tracing::info!(suite = %teardown, "AfterAll");
            Ok(())
        })
        .before_each(move |slot| {
            *slot = Some(MathUtil::new());
            tracing::info!(suite = %before, "BeforeEach");
            Ok(())
        })
        .after_each(move |slot| {
            *slot = None;
            tracing::info!(suite = %after, "AfterEach");
            Ok(())
        })
}

/// Division by zero, only on Linux with a supported toolchain, and only
/// when the server is up. It never is.
pub(crate) fn test_div() -> TestCase<Slot> {
    TestCase::new("testDiv", |slot: &mut Slot| {
        let is_server_up = false;
        assume_true(is_server_up)?;
        let math = math(slot)?;
        assert_err(
            math.div(10, 0),
            |e| *e == ArithError::DivisionByZero,
            "divide by ZERO should fail with DivisionByZero",
        )?;
        Ok(())
    })
    .enabled_on_os([Os::Linux])
    .when(Condition::runtime_range(
        Version::new(1, 70, 0),
        Version::new(2, 0, 0),
    ))
}

pub(crate) fn test_disabled() -> TestCase<Slot> {
    TestCase::new("testDisabled", |_: &mut Slot| {
        Ok(fail("This method shouldn't be run")?)
    })
    .display_name("TDD method should not be run")
    .disabled()
}
