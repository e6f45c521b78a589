//! Explicit-registration test harness
//!
//! Suites are plain values: a fixture factory, one-time and per-case hooks,
//! test cases with enablement conditions, and nested sub-suites. The runner
//! drives them in a fixed lifecycle order and classifies every case as
//! passed, failed, skipped or aborted.
//!
//! # Lifecycle
//!
//! For a suite in the default [`Lifecycle::PerCase`] mode:
//!
//! ```text
//! before_all
//!   construct -> before_each -> case -> after_each     (per case)
//!   construct -> skipped                               (disabled case)
//!   nested before_all
//!     construct(outer) -> outer before_each
//!       inner before_each -> case -> inner after_each
//!     outer after_each
//!   nested after_all
//! after_all
//! ```
//!
//! One-time hooks are shared: they never receive a fixture, whichever
//! lifecycle mode the suite uses.
//!
//! # Example
//!
//! ```
//! use mathutil_harness::{assert_equals, Suite, TestPlan, TestRunner};
//!
//! let suite = Suite::new("Counter", || 0_i32)
//!     .before_each(|n| {
//!         *n += 1;
//!         Ok(())
//!     })
//!     .case("starts_at_one", |n| Ok(assert_equals(1, *n, "fresh fixture")?));
//!
//! let mut plan = TestPlan::new();
//! plan.register(suite);
//!
//! let runs = TestRunner::new().with_parallel(false).run(&plan);
//! assert!(runs[0].runs[0].result.is_pass());
//! ```

pub mod assert;
pub mod condition;
pub mod config;
pub mod journal;
pub mod outcome;
pub mod plan;
pub mod reporter;
pub mod runner;
pub mod suite;

pub use assert::{
    assert_all, assert_equals, assert_err, assert_true, assume_that, assume_true, fail,
};
pub use condition::{Condition, Environment, Os};
pub use config::{ConfigError, ConfigResult, HarnessConfig};
pub use journal::{Event, Journal};
pub use outcome::{Aborted, Failure, Interrupt, Outcome};
pub use plan::{CaseInfo, Runnable, TestPlan};
pub use reporter::{json_report, TestReporter};
pub use runner::{Summary, SuiteRun, TestResult, TestRun, TestRunner};
pub use suite::{Lifecycle, Suite, TestCase};
