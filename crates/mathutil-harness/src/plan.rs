//! Test plan - the registry of suites to run

use crate::condition::Environment;
use crate::runner::SuiteRun;
use serde::Serialize;

/// Identity of a registered test case
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseInfo {
    /// Suite identifiers from the outermost suite inwards
    pub suite: Vec<String>,
    /// Suite labels (display name, or identifier), parallel to `suite`
    #[serde(skip)]
    pub suite_labels: Vec<String>,
    /// Case identifier (e.g., "testMul")
    pub name: String,
    /// Human-readable label used in reports
    pub display_name: Option<String>,
}

impl CaseInfo {
    /// The display name if set, otherwise the identifier.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    pub fn suite_path(&self) -> String {
        self.suite.join("::")
    }

    pub fn suite_label(&self) -> String {
        self.suite_labels.join(" > ")
    }

    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.suite_path(), self.name)
    }

    /// Whether a name filter selects this case.
    pub fn matches(&self, pattern: &str) -> bool {
        self.name.contains(pattern)
            || self
                .display_name
                .as_deref()
                .is_some_and(|label| label.contains(pattern))
            || self.suite.iter().any(|s| s.contains(pattern))
            || self.suite_labels.iter().any(|s| s.contains(pattern))
    }
}

/// Position of a suite within the nesting tree
#[derive(Debug, Clone, Default)]
pub(crate) struct SuitePath {
    names: Vec<String>,
    labels: Vec<String>,
}

impl SuitePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn child(&self, name: &str, label: &str) -> Self {
        let mut child = self.clone();
        child.names.push(name.to_string());
        child.labels.push(label.to_string());
        child
    }

    pub fn case(&self, name: &str, display_name: Option<&str>) -> CaseInfo {
        CaseInfo {
            suite: self.names.clone(),
            suite_labels: self.labels.clone(),
            name: name.to_string(),
            display_name: display_name.map(str::to_string),
        }
    }
}

/// A top-level suite, type-erased so plans can hold suites of any fixture
pub trait Runnable: Send + Sync {
    fn name(&self) -> &str;

    fn display_name(&self) -> Option<&str>;

    /// Every case, nested ones included, in registration order.
    fn cases(&self) -> Vec<CaseInfo>;

    /// Run the selected cases through the full lifecycle.
    fn run(&self, env: &Environment, filter: Option<&str>) -> SuiteRun;
}

/// An ordered set of suites plus an optional name filter
#[derive(Default)]
pub struct TestPlan {
    suites: Vec<Box<dyn Runnable>>,
    filter: Option<String>,
}

impl TestPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<S: Runnable + 'static>(&mut self, suite: S) -> &mut Self {
        self.suites.push(Box::new(suite));
        self
    }

    /// Keep only cases whose name, display name or suite contains `pattern`.
    pub fn with_filter(mut self, pattern: impl Into<String>) -> Self {
        self.filter = Some(pattern.into());
        self
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub fn suites(&self) -> &[Box<dyn Runnable>] {
        &self.suites
    }

    /// Selected cases across all suites.
    pub fn cases(&self) -> Vec<CaseInfo> {
        self.suites
            .iter()
            .flat_map(|suite| suite.cases())
            .filter(|info| self.filter().map_or(true, |p| info.matches(p)))
            .collect()
    }

    /// Check if the plan selects any case
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get count of selected cases
    pub fn len(&self) -> usize {
        self.cases().len()
    }
}
