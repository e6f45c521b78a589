//! Test runner - execute registered suites

use crate::condition::{parse_runtime_version, Environment};
use crate::config::{ConfigError, ConfigResult, HarnessConfig};
use crate::journal::Event;
use crate::outcome::{Interrupt, Outcome};
use crate::plan::{CaseInfo, TestPlan};
use rayon::prelude::*;
use std::time::Duration;

/// Result of running a single test
#[derive(Debug, Clone, PartialEq)]
pub enum TestResult {
    /// Test passed successfully
    Pass { duration: Duration },
    /// An assertion failed, a hook failed, or the body panicked
    Fail { error: String, duration: Duration },
    /// Never ran: disabled or an enablement condition was unmet
    Skip { reason: String },
    /// Started, then stopped by an unmet assumption
    Abort { reason: String, duration: Duration },
}

impl TestResult {
    pub(crate) fn from_outcome(outcome: Outcome, duration: Duration) -> Self {
        match outcome {
            Ok(()) => TestResult::Pass { duration },
            Err(interrupt) => Self::from_interrupt(interrupt, duration),
        }
    }

    pub(crate) fn from_interrupt(interrupt: Interrupt, duration: Duration) -> Self {
        match interrupt {
            Interrupt::Failed(failure) => TestResult::Fail {
                error: failure.message,
                duration,
            },
            Interrupt::Aborted(aborted) => TestResult::Abort {
                reason: aborted.to_string(),
                duration,
            },
        }
    }

    /// Check if this result is a pass
    pub fn is_pass(&self) -> bool {
        matches!(self, TestResult::Pass { .. })
    }

    /// Check if this result is a failure
    pub fn is_fail(&self) -> bool {
        matches!(self, TestResult::Fail { .. })
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, TestResult::Skip { .. })
    }

    pub fn is_abort(&self) -> bool {
        matches!(self, TestResult::Abort { .. })
    }

    /// Get the duration of this test (zero for skipped tests)
    pub fn duration(&self) -> Duration {
        match self {
            TestResult::Pass { duration } => *duration,
            TestResult::Fail { duration, .. } => *duration,
            TestResult::Skip { .. } => Duration::ZERO,
            TestResult::Abort { duration, .. } => *duration,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            TestResult::Pass { .. } => "passed",
            TestResult::Fail { .. } => "failed",
            TestResult::Skip { .. } => "skipped",
            TestResult::Abort { .. } => "aborted",
        }
    }

    /// Failure message, skip reason or abort reason
    pub fn message(&self) -> Option<&str> {
        match self {
            TestResult::Pass { .. } => None,
            TestResult::Fail { error, .. } => Some(error),
            TestResult::Skip { reason } | TestResult::Abort { reason, .. } => Some(reason),
        }
    }
}

/// A completed test run
#[derive(Debug, Clone)]
pub struct TestRun {
    /// The test that was run
    pub test: CaseInfo,
    /// Result of running the test
    pub result: TestResult,
}

/// Every run of one top-level suite, with its lifecycle journal
#[derive(Debug, Clone)]
pub struct SuiteRun {
    pub name: String,
    pub display_name: Option<String>,
    pub runs: Vec<TestRun>,
    pub events: Vec<Event>,
}

impl SuiteRun {
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    /// Find a run by case identifier.
    pub fn run(&self, case: &str) -> Option<&TestRun> {
        self.runs.iter().find(|run| run.test.name == case)
    }
}

/// Outcome counts over a whole run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub aborted: usize,
    pub duration: Duration,
}

impl Summary {
    pub fn of(suites: &[SuiteRun]) -> Self {
        let mut summary = Summary::default();
        for run in suites.iter().flat_map(|s| &s.runs) {
            summary.total += 1;
            summary.duration += run.result.duration();
            match run.result {
                TestResult::Pass { .. } => summary.passed += 1,
                TestResult::Fail { .. } => summary.failed += 1,
                TestResult::Skip { .. } => summary.skipped += 1,
                TestResult::Abort { .. } => summary.aborted += 1,
            }
        }
        summary
    }

    /// Skipped and aborted cases do not fail a run.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Test runner with configuration
pub struct TestRunner {
    /// Whether to run suites in parallel
    parallel: bool,
    /// Facts the enablement conditions are checked against
    environment: Environment,
}

impl Default for TestRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRunner {
    /// Create a new test runner with default settings
    pub fn new() -> Self {
        Self {
            parallel: true,
            environment: Environment::detect(),
        }
    }

    /// Build a runner from harness configuration
    pub fn from_config(config: &HarnessConfig) -> ConfigResult<Self> {
        let mut environment = Environment::detect();
        if let Some(version) = &config.runtime_version {
            let runtime =
                parse_runtime_version(version).map_err(|e| ConfigError::InvalidValue {
                    field: "runtime_version".to_string(),
                    reason: e.to_string(),
                })?;
            environment = environment.with_runtime(runtime);
        }
        Ok(Self::new()
            .with_parallel(config.parallel)
            .with_environment(environment))
    }

    /// Set whether to run suites in parallel
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Run every selected case of the plan.
    ///
    /// Suites with no selected case are left out of the result.
    pub fn run(&self, plan: &TestPlan) -> Vec<SuiteRun> {
        let runs = if self.parallel {
            self.run_parallel(plan)
        } else {
            self.run_sequential(plan)
        };
        runs.into_iter().filter(|suite| !suite.runs.is_empty()).collect()
    }

    /// Run suites sequentially
    fn run_sequential(&self, plan: &TestPlan) -> Vec<SuiteRun> {
        plan.suites()
            .iter()
            .map(|suite| suite.run(&self.environment, plan.filter()))
            .collect()
    }

    /// Run suites in parallel using rayon; cases within a suite stay ordered
    fn run_parallel(&self, plan: &TestPlan) -> Vec<SuiteRun> {
        plan.suites()
            .par_iter()
            .map(|suite| suite.run(&self.environment, plan.filter()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert::{assert_equals, assume_true, fail};
    use crate::condition::Os;
    use crate::suite::{Suite, TestCase};
    use semver::Version;

    fn runner() -> TestRunner {
        TestRunner::new()
            .with_parallel(false)
            .with_environment(Environment::new(Os::Linux, Version::new(1, 70, 0)))
    }

    fn mixed_plan() -> TestPlan {
        let mut plan = TestPlan::new();
        plan.register(
            Suite::new("Mixed", || 10)
                .case("passes", |n| Ok(assert_equals(10, *n, "")?))
                .case("fails", |n| Ok(assert_equals(11, *n, "")?))
                .test(TestCase::new("skips", |_: &mut i32| Ok(fail("ran")?)).disabled())
                .case("aborts", |_| {
                    assume_true(false)?;
                    Ok(fail("ran past assumption")?)
                }),
        );
        plan
    }

    #[test]
    fn test_runner_classifies_all_outcomes() {
        let suites = runner().run(&mixed_plan());
        let suite = &suites[0];

        assert!(suite.run("passes").unwrap().result.is_pass());
        assert!(suite.run("fails").unwrap().result.is_fail());
        assert!(suite.run("skips").unwrap().result.is_skip());
        let aborted = &suite.run("aborts").unwrap().result;
        assert!(aborted.is_abort());
        assert_eq!(
            aborted.message(),
            Some("Assumption failed: assumption is not true")
        );
    }

    #[test]
    fn test_summary_counts() {
        let summary = Summary::of(&runner().run(&mixed_plan()));
        assert_eq!(summary.total, 4);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.aborted, 1);
        assert!(!summary.is_success());
    }

    #[test]
    fn test_runner_parallel_matches_sequential() {
        let mut plan = TestPlan::new();
        for name in ["a", "b", "c"] {
            plan.register(Suite::new(name, || ()).case("ok", |_| Ok(())));
        }

        let sequential = runner().run(&plan);
        let parallel = runner().with_parallel(true).run(&plan);

        assert_eq!(sequential.len(), 3);
        assert_eq!(parallel.len(), 3);
        assert!(parallel
            .iter()
            .flat_map(|s| &s.runs)
            .all(|r| r.result.is_pass()));
    }

    #[test]
    fn test_filtered_out_suites_are_dropped() {
        let mut plan = TestPlan::new();
        plan.register(Suite::new("Left", || ()).case("alpha", |_| Ok(())));
        plan.register(Suite::new("Right", || ()).case("beta", |_| Ok(())));

        let suites = runner().run(&plan.with_filter("beta"));
        assert_eq!(suites.len(), 1);
        assert_eq!(suites[0].name, "Right");
    }

    #[test]
    fn test_runner_from_config_overrides_runtime() {
        let config = HarnessConfig {
            parallel: false,
            runtime_version: Some("1.82".to_string()),
            ..HarnessConfig::default()
        };
        let runner = TestRunner::from_config(&config).unwrap();
        assert_eq!(runner.environment().runtime, Version::new(1, 82, 0));
    }

    #[test]
    fn test_runner_from_config_rejects_bad_version() {
        let config = HarnessConfig {
            runtime_version: Some("eight".to_string()),
            ..HarnessConfig::default()
        };
        assert!(matches!(
            TestRunner::from_config(&config),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_result_duration() {
        let pass = TestResult::Pass {
            duration: Duration::from_millis(100),
        };
        assert_eq!(pass.duration(), Duration::from_millis(100));

        let skip = TestResult::Skip {
            reason: "disabled".to_string(),
        };
        assert_eq!(skip.duration(), Duration::ZERO);
    }
}
