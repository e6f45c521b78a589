//! Suite registration and lifecycle execution
//!
//! A [`Suite<F, P>`] owns a factory for its fixture `F`, its hooks, its cases
//! and its nested sub-suites. `P` is the fixture type of the enclosing suite:
//! `()` for a top-level suite, the parent's fixture for a nested one. Nested
//! cases receive the enclosing fixture as an explicit `&mut P` argument.
//!
//! Execution threads a *bracket* down the nesting levels. A bracket takes a
//! body that needs an enclosing fixture, wraps it in that suite's per-case
//! hooks (and, recursively, in every outer suite's), and returns the merged
//! outcome.

use crate::condition::{first_skip_reason, Condition, Environment, Os};
use crate::journal::{Event, Journal};
use crate::outcome::{Failure, Outcome};
use crate::plan::{CaseInfo, Runnable, SuitePath};
use crate::runner::{SuiteRun, TestResult, TestRun};
use semver::VersionReq;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

/// One-time hook. Shared: it never sees a fixture.
pub type Hook = Box<dyn Fn() -> Outcome + Send + Sync>;

/// Per-case hook operating on the suite's fixture
pub type FixtureHook<F> = Box<dyn Fn(&mut F) -> Outcome + Send + Sync>;

type Factory<F> = Box<dyn Fn() -> F + Send + Sync>;

type Body<F, P> = Box<dyn Fn(&mut F, &mut P) -> Outcome + Send + Sync>;

/// How many fixture instances a suite gets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    /// A fresh fixture for every case
    #[default]
    PerCase,
    /// One fixture, built before one-time setup, shared by every case
    PerSuite,
}

/// A single registered test case
pub struct TestCase<F, P = ()> {
    name: String,
    display_name: Option<String>,
    conditions: Vec<Condition>,
    body: Body<F, P>,
}

impl<F: 'static> TestCase<F> {
    pub fn new<B>(name: impl Into<String>, body: B) -> Self
    where
        B: Fn(&mut F) -> Outcome + Send + Sync + 'static,
    {
        Self::with_outer(name, move |fixture: &mut F, _: &mut ()| body(fixture))
    }
}

impl<F: 'static, P: 'static> TestCase<F, P> {
    /// A case that also receives the enclosing suite's fixture.
    pub fn with_outer<B>(name: impl Into<String>, body: B) -> Self
    where
        B: Fn(&mut F, &mut P) -> Outcome + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            display_name: None,
            conditions: Vec::new(),
            body: Box::new(body),
        }
    }

    pub fn display_name(mut self, label: impl Into<String>) -> Self {
        self.display_name = Some(label.into());
        self
    }

    pub fn when(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn disabled(self) -> Self {
        self.when(Condition::disabled())
    }

    pub fn disabled_because(self, reason: impl Into<String>) -> Self {
        self.when(Condition::Disabled {
            reason: Some(reason.into()),
        })
    }

    pub fn enabled_on_os(self, systems: impl IntoIterator<Item = Os>) -> Self {
        self.when(Condition::on_os(systems))
    }

    pub fn enabled_on_runtime(self, req: VersionReq) -> Self {
        self.when(Condition::EnabledOnRuntime(req))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn info(&self, path: &SuitePath) -> CaseInfo {
        path.case(&self.name, self.display_name.as_deref())
    }
}

/// A named group of cases sharing a fixture type and hooks
pub struct Suite<F, P = ()> {
    name: String,
    display_name: Option<String>,
    lifecycle: Lifecycle,
    factory: Factory<F>,
    before_all: Vec<Hook>,
    after_all: Vec<Hook>,
    before_each: Vec<FixtureHook<F>>,
    after_each: Vec<FixtureHook<F>>,
    cases: Vec<TestCase<F, P>>,
    nested: Vec<Box<dyn Group<F>>>,
}

impl<F: 'static> Suite<F> {
    /// A top-level suite whose fixtures come from `factory`.
    pub fn new<G>(name: impl Into<String>, factory: G) -> Self
    where
        G: Fn() -> F + Send + Sync + 'static,
    {
        Self::build(name.into(), Box::new(factory))
    }

    pub fn case<B>(self, name: impl Into<String>, body: B) -> Self
    where
        B: Fn(&mut F) -> Outcome + Send + Sync + 'static,
    {
        self.test(TestCase::new(name, body))
    }
}

impl<F: 'static, P: 'static> Suite<F, P> {
    /// A suite meant to be nested inside a suite with fixture `P`.
    pub fn enclosed<G>(name: impl Into<String>, factory: G) -> Self
    where
        G: Fn() -> F + Send + Sync + 'static,
    {
        Self::build(name.into(), Box::new(factory))
    }

    fn build(name: String, factory: Factory<F>) -> Self {
        Self {
            name,
            display_name: None,
            lifecycle: Lifecycle::default(),
            factory,
            before_all: Vec::new(),
            after_all: Vec::new(),
            before_each: Vec::new(),
            after_each: Vec::new(),
            cases: Vec::new(),
            nested: Vec::new(),
        }
    }

    pub fn display_name(mut self, label: impl Into<String>) -> Self {
        self.display_name = Some(label.into());
        self
    }

    pub fn lifecycle(mut self, lifecycle: Lifecycle) -> Self {
        self.lifecycle = lifecycle;
        self
    }

    pub fn before_all(mut self, hook: impl Fn() -> Outcome + Send + Sync + 'static) -> Self {
        self.before_all.push(Box::new(hook));
        self
    }

    pub fn after_all(mut self, hook: impl Fn() -> Outcome + Send + Sync + 'static) -> Self {
        self.after_all.push(Box::new(hook));
        self
    }

    pub fn before_each(mut self, hook: impl Fn(&mut F) -> Outcome + Send + Sync + 'static) -> Self {
        self.before_each.push(Box::new(hook));
        self
    }

    pub fn after_each(mut self, hook: impl Fn(&mut F) -> Outcome + Send + Sync + 'static) -> Self {
        self.after_each.push(Box::new(hook));
        self
    }

    pub fn test(mut self, case: TestCase<F, P>) -> Self {
        self.cases.push(case);
        self
    }

    /// Register a case that receives the enclosing fixture.
    pub fn case_with<B>(self, name: impl Into<String>, body: B) -> Self
    where
        B: Fn(&mut F, &mut P) -> Outcome + Send + Sync + 'static,
    {
        self.test(TestCase::with_outer(name, body))
    }

    /// Nest a sub-suite. Its hooks run inside this suite's hooks.
    pub fn nested<N: 'static>(mut self, group: Suite<N, F>) -> Self {
        self.nested.push(Box::new(group));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    fn construct(&self, exec: &Exec<'_>) -> F {
        let fixture = (self.factory)();
        exec.journal.record(Event::Constructed {
            suite: self.name.clone(),
        });
        fixture
    }

    /// Run `f` on the live fixture, or on a fresh one when none is held.
    fn with_fixture<R>(
        &self,
        exec: &Exec<'_>,
        instance: &mut Instance<F>,
        f: impl FnOnce(&mut F) -> R,
    ) -> R {
        match &mut instance.fixture {
            Some(fixture) => f(fixture),
            None => {
                let mut fresh = self.construct(exec);
                f(&mut fresh)
            }
        }
    }

    fn run_shared_hooks(&self, exec: &Exec<'_>, hooks: &[Hook], event: Event) -> Outcome {
        if hooks.is_empty() {
            return Ok(());
        }
        exec.journal.record(event);
        for hook in hooks {
            guarded(hook)?;
        }
        Ok(())
    }

    fn run_fixture_hooks(
        &self,
        exec: &Exec<'_>,
        hooks: &[FixtureHook<F>],
        fixture: &mut F,
        event: impl FnOnce() -> Event,
    ) -> Outcome {
        if hooks.is_empty() {
            return Ok(());
        }
        exec.journal.record(event());
        for hook in hooks {
            guarded(|| hook(fixture))?;
        }
        Ok(())
    }

    /// Per-case setup, `body`, per-case teardown. Teardown always runs.
    fn bracket_case(
        &self,
        exec: &Exec<'_>,
        case: &str,
        fixture: &mut F,
        body: impl FnOnce(&mut F) -> Outcome,
    ) -> Outcome {
        let setup = self.run_fixture_hooks(exec, &self.before_each, fixture, || {
            Event::BeforeEach {
                suite: self.name.clone(),
                case: case.to_string(),
            }
        });
        let main = match setup {
            Ok(()) => body(fixture),
            Err(interrupt) => Err(interrupt),
        };
        let teardown = self.run_fixture_hooks(exec, &self.after_each, fixture, || {
            Event::AfterEach {
                suite: self.name.clone(),
                case: case.to_string(),
            }
        });
        merge(main, teardown)
    }

    /// This suite acting as the enclosing bracket of one of its nested groups.
    ///
    /// A pin builds the enclosing fixtures outermost first and keeps them
    /// until the matching unpin, so every case of a per-suite group sees the
    /// same enclosing instances. Per-case hooks still bracket each case.
    fn enter(
        &self,
        exec: &Exec<'_>,
        entry: Entry,
        case: &str,
        instance: &mut Instance<F>,
        enclosing: &mut Bracket<'_, P>,
        body: &mut dyn FnMut(&mut F) -> Outcome,
    ) -> Outcome {
        match entry {
            Entry::Pin => {
                enclosing(Entry::Pin, case, &mut |_: &mut P| Ok(()))?;
                instance.pin(|| self.construct(exec));
                Ok(())
            }
            Entry::Unpin => {
                instance.unpin();
                enclosing(Entry::Unpin, case, &mut |_: &mut P| Ok(()))
            }
            Entry::Instantiate | Entry::Run => enclosing(entry, case, &mut |_: &mut P| {
                self.with_fixture(exec, instance, |fixture| {
                    if entry == Entry::Run {
                        self.bracket_case(exec, case, fixture, |f| body(f))
                    } else {
                        body(fixture)
                    }
                })
            }),
        }
    }

    fn run_case(
        &self,
        exec: &Exec<'_>,
        case: &TestCase<F, P>,
        info: CaseInfo,
        instance: &mut Instance<F>,
        enclosing: &mut Bracket<'_, P>,
    ) -> TestRun {
        let start = Instant::now();

        if let Some(reason) = first_skip_reason(&case.conditions, exec.env) {
            // Skipped cases are still instantiated, but no hook runs.
            let _ = enclosing(Entry::Instantiate, &case.name, &mut |_: &mut P| {
                self.with_fixture(exec, instance, |_| Ok(()))
            });
            exec.journal.record(Event::Skipped {
                suite: self.name.clone(),
                case: case.name.clone(),
                reason: reason.clone(),
            });
            tracing::info!(case = %info.qualified_name(), %reason, "skipped");
            return TestRun {
                test: info,
                result: TestResult::Skip { reason },
            };
        }

        let outcome = enclosing(Entry::Run, &case.name, &mut |parent: &mut P| {
            self.with_fixture(exec, instance, |fixture| {
                self.bracket_case(exec, &case.name, fixture, |f| {
                    exec.journal.record(Event::CaseBody {
                        suite: self.name.clone(),
                        case: case.name.clone(),
                    });
                    guarded(|| (case.body)(f, parent))
                })
            })
        });

        let result = TestResult::from_outcome(outcome, start.elapsed());
        tracing::debug!(case = %info.qualified_name(), outcome = result.kind(), "finished");
        TestRun { test: info, result }
    }
}

/// Keep the first interrupt; a teardown interrupt only surfaces on success.
fn merge(main: Outcome, teardown: Outcome) -> Outcome {
    match (main, teardown) {
        (Ok(()), teardown) => teardown,
        (main, Ok(())) => main,
        (main, Err(teardown)) => {
            tracing::warn!(error = %teardown, "per-case teardown failed after an earlier interrupt");
            main
        }
    }
}

/// Run a hook or body, turning a panic into a [`Failure`].
pub(crate) fn guarded(f: impl FnOnce() -> Outcome) -> Outcome {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(outcome) => outcome,
        Err(payload) => Err(Failure::new(format!("panicked: {}", panic_message(payload.as_ref()))).into()),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

// ============================================================================
// Type-erased execution
// ============================================================================

/// What an enclosing bracket is asked to do for one case
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Entry {
    /// Build fixtures only, run no hooks (skipped case)
    Instantiate,
    /// Build fixtures and run per-case hooks around the body
    Run,
    /// Build the enclosing fixtures now and keep them until `Unpin`
    Pin,
    /// Release what the matching `Pin` built
    Unpin,
}

/// A suite's fixture during one execution
struct Instance<F> {
    fixture: Option<F>,
    pins: usize,
    built_by_pin: bool,
}

impl<F> Instance<F> {
    fn empty() -> Self {
        Self {
            fixture: None,
            pins: 0,
            built_by_pin: false,
        }
    }

    fn held(fixture: F) -> Self {
        Self {
            fixture: Some(fixture),
            pins: 0,
            built_by_pin: false,
        }
    }

    fn pin(&mut self, construct: impl FnOnce() -> F) {
        self.pins += 1;
        if self.fixture.is_none() {
            self.fixture = Some(construct());
            self.built_by_pin = true;
        }
    }

    fn unpin(&mut self) {
        self.pins = self.pins.saturating_sub(1);
        if self.pins == 0 && self.built_by_pin {
            self.fixture = None;
            self.built_by_pin = false;
        }
    }
}

/// Provides an enclosing fixture of type `P` to `body`, wrapped in hooks.
pub(crate) type Bracket<'a, P> =
    dyn FnMut(Entry, &str, &mut dyn FnMut(&mut P) -> Outcome) -> Outcome + 'a;

/// Per-suite-run execution state
pub(crate) struct Exec<'a> {
    pub journal: &'a Journal,
    pub env: &'a Environment,
    pub filter: Option<&'a str>,
}

impl Exec<'_> {
    fn selects(&self, info: &CaseInfo) -> bool {
        self.filter.map_or(true, |pattern| info.matches(pattern))
    }
}

/// A suite nested in an enclosing suite with fixture `P`
pub(crate) trait Group<P>: Send + Sync {
    fn describe(&self, parent: &SuitePath) -> Vec<CaseInfo>;

    fn execute(
        &self,
        exec: &Exec<'_>,
        parent: &SuitePath,
        enclosing: &mut Bracket<'_, P>,
    ) -> Vec<TestRun>;
}

impl<F: 'static, P: 'static> Group<P> for Suite<F, P> {
    fn describe(&self, parent: &SuitePath) -> Vec<CaseInfo> {
        let path = parent.child(&self.name, self.label());
        let mut cases: Vec<CaseInfo> = self.cases.iter().map(|c| c.info(&path)).collect();
        for group in &self.nested {
            cases.extend(group.describe(&path));
        }
        cases
    }

    fn execute(
        &self,
        exec: &Exec<'_>,
        parent: &SuitePath,
        enclosing: &mut Bracket<'_, P>,
    ) -> Vec<TestRun> {
        let path = parent.child(&self.name, self.label());

        let selected: Vec<(&TestCase<F, P>, CaseInfo)> = self
            .cases
            .iter()
            .map(|case| (case, case.info(&path)))
            .filter(|(_, info)| exec.selects(info))
            .collect();
        let groups: Vec<&dyn Group<F>> = self
            .nested
            .iter()
            .map(|group| group.as_ref())
            .filter(|group| group.describe(&path).iter().any(|info| exec.selects(info)))
            .collect();

        // Nothing selected: the suite does not run and its hooks stay silent.
        if selected.is_empty() && groups.is_empty() {
            return Vec::new();
        }

        tracing::info!(suite = %self.name, cases = selected.len(), nested = groups.len(), "running suite");

        // A per-suite instance holds its enclosing instances for its lifetime.
        let mut instance = match self.lifecycle {
            Lifecycle::PerSuite => {
                let _ = enclosing(Entry::Pin, &self.name, &mut |_: &mut P| Ok(()));
                Instance::held(self.construct(exec))
            }
            Lifecycle::PerCase => Instance::empty(),
        };

        let setup = self.run_shared_hooks(
            exec,
            &self.before_all,
            Event::SuiteSetup {
                suite: self.name.clone(),
            },
        );

        let mut runs = Vec::new();
        match setup {
            Err(interrupt) => {
                tracing::warn!(suite = %self.name, error = %interrupt, "one-time setup interrupted");
                let result = TestResult::from_interrupt(interrupt, Duration::ZERO);
                let infos = selected
                    .iter()
                    .map(|(_, info)| info.clone())
                    .chain(groups.iter().flat_map(|group| group.describe(&path)))
                    .filter(|info| exec.selects(info));
                runs.extend(infos.map(|info| TestRun {
                    test: info,
                    result: result.clone(),
                }));
            }
            Ok(()) => {
                for (case, info) in &selected {
                    runs.push(self.run_case(exec, case, info.clone(), &mut instance, enclosing));
                }
                for group in &groups {
                    let mut bracket =
                        |entry: Entry, case: &str, body: &mut dyn FnMut(&mut F) -> Outcome| {
                            self.enter(exec, entry, case, &mut instance, enclosing, body)
                        };
                    runs.extend(group.execute(exec, &path, &mut bracket));
                }
            }
        }

        let teardown = self.run_shared_hooks(
            exec,
            &self.after_all,
            Event::SuiteTeardown {
                suite: self.name.clone(),
            },
        );
        if let Err(interrupt) = teardown {
            tracing::warn!(suite = %self.name, error = %interrupt, "one-time teardown interrupted");
            for run in runs.iter_mut().filter(|run| run.result.is_pass()) {
                run.result = TestResult::Fail {
                    error: format!("one-time teardown failed: {}", interrupt),
                    duration: run.result.duration(),
                };
            }
        }

        if self.lifecycle == Lifecycle::PerSuite {
            let _ = enclosing(Entry::Unpin, &self.name, &mut |_: &mut P| Ok(()));
        }

        runs
    }
}

impl<F: 'static> Runnable for Suite<F> {
    fn name(&self) -> &str {
        &self.name
    }

    fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    fn cases(&self) -> Vec<CaseInfo> {
        self.describe(&SuitePath::root())
    }

    fn run(&self, env: &Environment, filter: Option<&str>) -> SuiteRun {
        let journal = Journal::new();
        let exec = Exec {
            journal: &journal,
            env,
            filter,
        };
        let mut root = |_: Entry, _: &str, body: &mut dyn FnMut(&mut ()) -> Outcome| body(&mut ());
        let runs = self.execute(&exec, &SuitePath::root(), &mut root);

        SuiteRun {
            name: self.name.clone(),
            display_name: self.display_name.clone(),
            runs,
            events: journal.into_events(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::{Aborted, Interrupt};
    use semver::Version;

    fn env() -> Environment {
        Environment::new(Os::Linux, Version::new(1, 70, 0))
    }

    fn run(suite: &Suite<i32>) -> SuiteRun {
        suite.run(&env(), None)
    }

    #[test]
    fn test_guarded_turns_panic_into_failure() {
        let outcome = guarded(|| panic!("boom"));
        match outcome {
            Err(Interrupt::Failed(failure)) => assert_eq!(failure.message, "panicked: boom"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_merge_prefers_first_interrupt() {
        let fail: Outcome = Err(Failure::new("body").into());
        let abort: Outcome = Err(Aborted::new("teardown").into());
        assert_eq!(merge(Ok(()), Ok(())), Ok(()));
        assert_eq!(merge(Ok(()), abort.clone()), abort);
        assert_eq!(merge(fail.clone(), abort), fail);
    }

    #[test]
    fn test_per_case_fixture_is_fresh() {
        let suite = Suite::new("Fresh", || 0)
            .before_each(|n| {
                *n += 1;
                Ok(())
            })
            .case("first", |n| Ok(crate::assert_equals(1, *n, "")?))
            .case("second", |n| Ok(crate::assert_equals(1, *n, "")?));

        let result = run(&suite);
        assert!(result.runs.iter().all(|r| r.result.is_pass()));
        let constructed = result
            .events
            .iter()
            .filter(|e| matches!(e, Event::Constructed { .. }))
            .count();
        assert_eq!(constructed, 2);
    }

    #[test]
    fn test_per_suite_fixture_is_shared() {
        let suite = Suite::new("Shared", || 0)
            .lifecycle(Lifecycle::PerSuite)
            .before_each(|n| {
                *n += 1;
                Ok(())
            })
            .case("first", |n| Ok(crate::assert_equals(1, *n, "")?))
            .case("second", |n| Ok(crate::assert_equals(2, *n, "")?));

        let result = run(&suite);
        assert!(result.runs.iter().all(|r| r.result.is_pass()));
        assert_eq!(
            result.events.first(),
            Some(&Event::Constructed {
                suite: "Shared".into()
            })
        );
    }

    #[test]
    fn test_failing_before_each_skips_body_but_runs_after_each() {
        let suite = Suite::new("Broken", || 0)
            .before_each(|_| Err(Failure::new("setup broke").into()))
            .after_each(|_| Ok(()))
            .case("never", |_| Ok(crate::fail("body ran")?));

        let result = run(&suite);
        match &result.runs[0].result {
            TestResult::Fail { error, .. } => assert_eq!(error, "setup broke"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(!result
            .events
            .iter()
            .any(|e| matches!(e, Event::CaseBody { .. })));
        assert!(result
            .events
            .iter()
            .any(|e| matches!(e, Event::AfterEach { .. })));
    }

    #[test]
    fn test_failing_after_each_fails_passing_case() {
        let suite = Suite::new("Teardown", || 0)
            .after_each(|_| Err(Failure::new("cleanup broke").into()))
            .case("ok", |_| Ok(()));

        let result = run(&suite);
        assert!(result.runs[0].result.is_fail());
    }

    #[test]
    fn test_failing_before_all_fails_every_case() {
        let suite = Suite::new("NoSetup", || 0)
            .before_all(|| Err(Failure::new("no database").into()))
            .after_all(|| Ok(()))
            .case("a", |_| Ok(()))
            .case("b", |_| Ok(()));

        let result = run(&suite);
        assert_eq!(result.runs.len(), 2);
        assert!(result.runs.iter().all(|r| r.result.is_fail()));
        assert!(!result
            .events
            .iter()
            .any(|e| matches!(e, Event::Constructed { .. } | Event::CaseBody { .. })));
        assert_eq!(
            result.events.last(),
            Some(&Event::SuiteTeardown {
                suite: "NoSetup".into()
            })
        );
    }

    #[test]
    fn test_aborting_before_all_aborts_every_case() {
        let suite = Suite::new("Assumed", || 0)
            .before_all(|| Err(Aborted::new("offline").into()))
            .case("a", |_| Ok(()));

        let result = run(&suite);
        assert!(result.runs[0].result.is_abort());
    }

    #[test]
    fn test_failing_after_all_fails_passed_cases() {
        let suite = Suite::new("LateFailure", || 0)
            .after_all(|| Err(Failure::new("leak").into()))
            .case("ok", |_| Ok(()))
            .test(TestCase::new("off", |_: &mut i32| Ok(())).disabled());

        let result = run(&suite);
        assert!(result.runs[0].result.is_fail());
        assert!(result.runs[1].result.is_skip());
    }

    #[test]
    fn test_panicking_body_is_a_failure() {
        let suite = Suite::new("Panics", || 0).case("explodes", |_| panic!("kaboom"));

        let result = run(&suite);
        match &result.runs[0].result {
            TestResult::Fail { error, .. } => assert!(error.contains("kaboom")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_nested_case_sees_outer_fixture() {
        let suite = Suite::new("Outer", || 0)
            .before_each(|n| {
                *n = 41;
                Ok(())
            })
            .nested(
                Suite::enclosed("Inner", || 1).case_with("sum", |inner: &mut i32, outer: &mut i32| {
                    Ok(crate::assert_equals(42, *inner + *outer, "")?)
                }),
            );

        let result = run(&suite);
        assert_eq!(result.runs.len(), 1);
        assert!(result.runs[0].result.is_pass());
        assert_eq!(result.runs[0].test.suite, vec!["Outer", "Inner"]);
    }

    fn constructions(result: &SuiteRun) -> Vec<&str> {
        result
            .events
            .iter()
            .filter_map(|e| match e {
                Event::Constructed { suite } => Some(suite.as_str()),
                _ => None,
            })
            .collect()
    }

    fn counting(name: &str, lifecycle: Lifecycle) -> Suite<i32, i32> {
        Suite::enclosed(name, || 0)
            .lifecycle(lifecycle)
            .case_with("first", |_: &mut i32, outer: &mut i32| {
                *outer += 1;
                Ok(crate::assert_equals(1, *outer, "")?)
            })
            .case_with("second", |_: &mut i32, outer: &mut i32| {
                *outer += 1;
                Ok(crate::assert_equals(2, *outer, "")?)
            })
    }

    #[test]
    fn test_per_suite_group_keeps_one_enclosing_instance() {
        let suite = Suite::new("Outer", || 0)
            .before_each(|_| Ok(()))
            .nested(counting("Inner", Lifecycle::PerSuite));

        let result = run(&suite);
        assert!(result.runs.iter().all(|r| r.result.is_pass()));
        assert_eq!(constructions(&result), vec!["Outer", "Inner"]);
        let outer_setups = result
            .events
            .iter()
            .filter(|e| matches!(e, Event::BeforeEach { suite, .. } if suite == "Outer"))
            .count();
        assert_eq!(outer_setups, 2);
    }

    #[test]
    fn test_per_case_group_rebuilds_enclosing_instance() {
        let suite = Suite::new("Outer", || 0).nested(counting("Inner", Lifecycle::PerCase));

        let result = run(&suite);
        assert!(result.runs[0].result.is_pass());
        assert!(result.runs[1].result.is_fail());
        assert_eq!(constructions(&result), vec!["Outer", "Inner", "Outer", "Inner"]);
    }

    #[test]
    fn test_per_suite_group_pins_every_enclosing_level() {
        let inner = Suite::enclosed("Inner", || ())
            .lifecycle(Lifecycle::PerSuite)
            .case_with("a", |_: &mut (), middle: &mut i32| {
                *middle += 1;
                Ok(())
            })
            .case_with("b", |_: &mut (), middle: &mut i32| {
                Ok(crate::assert_equals(1, *middle, "")?)
            });
        let suite = Suite::new("Outer", || 0).nested(Suite::enclosed("Middle", || 0).nested(inner));

        let result = run(&suite);
        assert!(result.runs.iter().all(|r| r.result.is_pass()));
        assert_eq!(constructions(&result), vec!["Outer", "Middle", "Inner"]);
    }

    #[test]
    fn test_pinned_instance_released_after_group() {
        let suite = Suite::new("Outer", || 0)
            .nested(counting("Pinned", Lifecycle::PerSuite))
            .nested(
                Suite::enclosed("Fresh", || 0).case_with("fresh", |_: &mut i32, outer: &mut i32| {
                    Ok(crate::assert_equals(0, *outer, "")?)
                }),
            );

        let result = run(&suite);
        assert!(result.runs.iter().all(|r| r.result.is_pass()));
        assert_eq!(
            constructions(&result),
            vec!["Outer", "Pinned", "Outer", "Fresh"]
        );
    }

    #[test]
    fn test_disabled_because_reports_reason() {
        let suite = Suite::new("Reasons", || 0)
            .test(TestCase::new("later", |_: &mut i32| Ok(())).disabled_because("needs a server"));

        let result = run(&suite);
        assert_eq!(
            result.runs[0].result,
            TestResult::Skip {
                reason: "needs a server".to_string()
            }
        );
    }
}
