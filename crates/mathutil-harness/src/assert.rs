//! Assertion and assumption primitives
//!
//! ## Assertions (yield [`Failure`])
//! - `assert_equals(expected, actual, message)`
//! - `assert_true(condition, message)`
//! - `assert_err(result, predicate, message)`: result must be an accepted `Err`
//! - `assert_all(checks)`: every check is evaluated, all failures reported
//! - `fail(message)`
//!
//! ## Assumptions (yield [`Aborted`])
//! - `assume_true(condition)`
//! - `assume_that(condition, message)`

use crate::outcome::{Aborted, Failure};
use std::fmt::Debug;

/// Prefix the caller's message onto a mismatch description.
fn with_message(message: &str, detail: String) -> Failure {
    if message.is_empty() {
        Failure::new(detail)
    } else {
        Failure::new(format!("{} ==> {}", message, detail))
    }
}

/// Fails unless `expected == actual`.
pub fn assert_equals<T>(expected: T, actual: T, message: &str) -> Result<(), Failure>
where
    T: PartialEq + Debug,
{
    if expected == actual {
        return Ok(());
    }
    Err(with_message(
        message,
        format!("expected: <{:?}> but was: <{:?}>", expected, actual),
    ))
}

/// Fails unless `condition` holds.
pub fn assert_true(condition: bool, message: &str) -> Result<(), Failure> {
    if condition {
        Ok(())
    } else {
        Err(with_message(message, "expected: <true> but was: <false>".into()))
    }
}

/// Fails unless `result` is an `Err` accepted by `accepts`.
///
/// Returns the error so the caller can inspect it further.
pub fn assert_err<T, E, P>(result: Result<T, E>, accepts: P, message: &str) -> Result<E, Failure>
where
    T: Debug,
    E: Debug,
    P: FnOnce(&E) -> bool,
{
    match result {
        Err(err) if accepts(&err) => Ok(err),
        Err(err) => Err(with_message(
            message,
            format!("Unexpected error: <{:?}>", err),
        )),
        Ok(value) => Err(with_message(
            message,
            format!("Expected an error but got: <Ok({:?})>", value),
        )),
    }
}

/// Combines already-evaluated checks, reporting every failure at once.
pub fn assert_all<I>(checks: I) -> Result<(), Failure>
where
    I: IntoIterator<Item = Result<(), Failure>>,
{
    let failures: Vec<Failure> = checks.into_iter().filter_map(Result::err).collect();
    match failures.len() {
        0 => Ok(()),
        n => {
            let mut message = format!(
                "Multiple Failures ({} failure{})",
                n,
                if n == 1 { "" } else { "s" }
            );
            for failure in failures {
                message.push_str("\n\t");
                message.push_str(&failure.message);
            }
            Err(Failure::new(message))
        }
    }
}

/// Unconditional failure.
pub fn fail<T>(message: &str) -> Result<T, Failure> {
    Err(Failure::new(message))
}

/// Aborts the current case unless `condition` holds.
pub fn assume_true(condition: bool) -> Result<(), Aborted> {
    assume_that(condition, "assumption is not true")
}

/// Like [`assume_true`] with a custom reason.
pub fn assume_that(condition: bool, message: &str) -> Result<(), Aborted> {
    if condition {
        Ok(())
    } else {
        Err(Aborted::new(message))
    }
}
