//! Integer arithmetic utility
//!
//! `MathUtil` is a stateless value exposing `add`, `mul` and `div` over `i32`.
//! Overflow wraps in two's complement, like unchecked 32-bit integer
//! arithmetic. Division is the only fallible operation.
//!
//! # Example
//!
//! ```
//! use mathutil_core::{ArithError, MathUtil};
//!
//! let math = MathUtil::new();
//! assert_eq!(math.add(10, 20), 30);
//! assert_eq!(math.div(7, 2), Ok(3));
//! assert_eq!(math.div(10, 0), Err(ArithError::DivisionByZero));
//! ```

use thiserror::Error;

/// Arithmetic errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithError {
    #[error("/ by zero")]
    DivisionByZero,
}

/// Result type for arithmetic operations
pub type ArithResult<T> = Result<T, ArithError>;

/// Stateless integer arithmetic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MathUtil;

impl MathUtil {
    pub fn new() -> Self {
        MathUtil
    }

    /// `a + b`, wrapping on overflow.
    pub fn add(&self, a: i32, b: i32) -> i32 {
        a.wrapping_add(b)
    }

    /// `a * b`, wrapping on overflow.
    pub fn mul(&self, a: i32, b: i32) -> i32 {
        a.wrapping_mul(b)
    }

    /// Truncating division.
    ///
    /// Fails with [`ArithError::DivisionByZero`] when `b == 0`.
    /// `i32::MIN / -1` wraps to `i32::MIN`.
    pub fn div(&self, a: i32, b: i32) -> ArithResult<i32> {
        if b == 0 {
            return Err(ArithError::DivisionByZero);
        }
        Ok(a.wrapping_div(b))
    }
}
