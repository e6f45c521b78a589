//! `MathUtilTest1`: grouped assertions and a nested per-suite group

use super::{instance, math, test_disabled, test_div, with_math_hooks, Slot};
use mathutil_harness::{assert_all, assert_equals, Lifecycle, Suite, TestCase};

const NAME: &str = "MathUtilTest1";

pub fn suite() -> Suite<Slot> {
    with_math_hooks(Suite::new(NAME, instance(NAME)))
        .display_name("When running MathUtils")
        .test(
            TestCase::new("testMul", |slot: &mut Slot| {
                let math = math(slot)?;
                Ok(assert_all([
                    assert_equals(4, math.mul(2, 2), "2 * 2"),
                    assert_equals(-2, math.mul(-2, 1), "-2 * 1"),
                    assert_equals(0, math.mul(2, 0), "2 * 0"),
                ])?)
            })
            .display_name("mul method"),
        )
        .test(test_div())
        .test(test_disabled())
        .nested(add_test())
}

/// One instance for the whole group; cases use the enclosing suite's `MathUtil`.
fn add_test() -> Suite<(), Slot> {
    Suite::enclosed("AddTest", || {
        tracing::info!(suite = "AddTest", "0 - param constr");
    })
        .display_name("add test")
        .lifecycle(Lifecycle::PerSuite)
        .test(
            TestCase::with_outer("testAddPossitiveNumbers", |_: &mut (), outer: &mut Slot| {
                let actual = math(outer)?.add(10, 20);
                Ok(assert_equals(30, actual, "should return the right result")?)
            })
            .display_name("When adding two possitive numbers"),
        )
        .test(
            TestCase::with_outer("testAddNegativeNumbers", |_: &mut (), outer: &mut Slot| {
                let actual = math(outer)?.add(-10, -20);
                Ok(assert_equals(-30, actual, "should return the right result")?)
            })
            .display_name("When adding two negative numbers"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathutil_harness::{Environment, Event, Os, Runnable, SuiteRun};
    use pretty_assertions::assert_eq;
    use semver::Version;

    fn run(filter: Option<&str>) -> SuiteRun {
        suite().run(&Environment::new(Os::Linux, Version::new(1, 70, 0)), filter)
    }

    #[test]
    fn test_case_outcomes() {
        let run = run(None);
        let kinds: Vec<_> = run
            .runs
            .iter()
            .map(|r| (r.test.label(), r.result.kind()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("mul method", "passed"),
                ("testDiv", "aborted"),
                ("TDD method should not be run", "skipped"),
                ("When adding two possitive numbers", "passed"),
                ("When adding two negative numbers", "passed"),
            ]
        );
    }

    #[test]
    fn test_nested_group_constructed_once() {
        let run = run(None);
        let constructions = run
            .events
            .iter()
            .filter(|e| **e == Event::Constructed { suite: "AddTest".into() })
            .count();
        assert_eq!(constructions, 1);
    }

    #[test]
    fn test_nested_case_inside_outer_hooks() {
        let run = run(Some("testAddNegativeNumbers"));
        let case = "testAddNegativeNumbers";
        let tail: Vec<_> = run
            .events
            .iter()
            .filter(|e| !matches!(e, Event::SuiteSetup { .. } | Event::SuiteTeardown { .. }))
            .cloned()
            .collect();
        assert_eq!(
            tail,
            vec![
                Event::Constructed { suite: NAME.into() },
                Event::Constructed { suite: "AddTest".into() },
                Event::BeforeEach { suite: NAME.into(), case: case.into() },
                Event::CaseBody { suite: "AddTest".into(), case: case.into() },
                Event::AfterEach { suite: NAME.into(), case: case.into() },
            ]
        );
    }

    #[test]
    fn test_nested_group_reuses_enclosing_instance() {
        let run = run(Some("AddTest"));
        assert_eq!(run.runs.len(), 2);
        assert!(run.runs.iter().all(|r| r.result.is_pass()));
        let constructed: Vec<_> = run
            .events
            .iter()
            .filter_map(|e| match e {
                Event::Constructed { suite } => Some(suite.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(constructed, vec![NAME, "AddTest"]);
    }

    #[test]
    fn test_nested_labels() {
        let run = run(Some("add test"));
        assert_eq!(run.runs.len(), 2);
        assert_eq!(run.runs[0].test.suite_label(), "When running MathUtils > add test");
        assert_eq!(run.runs[0].test.qualified_name(), "MathUtilTest1::AddTest::testAddPossitiveNumbers");
    }
}
