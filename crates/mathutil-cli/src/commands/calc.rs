//! Calculator commands - `add`, `mul` and `div` on the command line

use anyhow::Result;
use mathutil_core::{ArithResult, MathUtil};
use serde_json::json;

/// Arithmetic operation selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Mul,
    Div,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Mul => "mul",
            Operation::Div => "div",
        }
    }

    pub fn apply(self, math: &MathUtil, a: i32, b: i32) -> ArithResult<i32> {
        match self {
            Operation::Add => Ok(math.add(a, b)),
            Operation::Mul => Ok(math.mul(a, b)),
            Operation::Div => math.div(a, b),
        }
    }
}

/// Arguments for a calculator command
#[derive(Debug, Clone, Copy)]
pub struct CalcArgs {
    pub operation: Operation,
    pub a: i32,
    pub b: i32,
    pub json: bool,
}

/// Run a calculator command
pub fn run(args: CalcArgs) -> Result<()> {
    let math = MathUtil::new();
    let result = args.operation.apply(&math, args.a, args.b);
    tracing::debug!(op = args.operation.name(), a = args.a, b = args.b, ?result, "evaluated");
    let value = result?;

    if args.json {
        println!(
            "{}",
            json!({
                "operation": args.operation.name(),
                "a": args.a,
                "b": args.b,
                "result": value,
            })
        );
    } else {
        println!("{}", value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathutil_core::ArithError;

    #[test]
    fn test_apply() {
        let math = MathUtil::new();
        assert_eq!(Operation::Add.apply(&math, 10, 20), Ok(30));
        assert_eq!(Operation::Mul.apply(&math, -2, 1), Ok(-2));
        assert_eq!(Operation::Div.apply(&math, 7, 2), Ok(3));
        assert_eq!(
            Operation::Div.apply(&math, 10, 0),
            Err(ArithError::DivisionByZero)
        );
    }

    #[test]
    fn test_run_div_by_zero_is_error() {
        let args = CalcArgs {
            operation: Operation::Div,
            a: 10,
            b: 0,
            json: false,
        };
        let err = run(args).unwrap_err();
        assert_eq!(err.to_string(), "/ by zero");
    }

    #[test]
    fn test_run_prints_result() {
        let args = CalcArgs {
            operation: Operation::Add,
            a: 1,
            b: 2,
            json: true,
        };
        assert!(run(args).is_ok());
    }
}
