//! Lifecycle journal
//!
//! The runner records every lifecycle step of a suite in the order it happens.
//! Each record is also emitted as a `tracing` debug event.

use serde::Serialize;
use std::cell::RefCell;
use std::fmt;

/// One lifecycle step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// A fixture instance was built by the suite's factory
    Constructed { suite: String },
    /// One-time setup hooks ran
    SuiteSetup { suite: String },
    /// Per-case setup hooks ran
    BeforeEach { suite: String, case: String },
    /// The case body ran
    CaseBody { suite: String, case: String },
    /// Per-case teardown hooks ran
    AfterEach { suite: String, case: String },
    /// The case was skipped before any hook
    Skipped {
        suite: String,
        case: String,
        reason: String,
    },
    /// One-time teardown hooks ran
    SuiteTeardown { suite: String },
}

impl Event {
    pub fn suite(&self) -> &str {
        match self {
            Event::Constructed { suite }
            | Event::SuiteSetup { suite }
            | Event::BeforeEach { suite, .. }
            | Event::CaseBody { suite, .. }
            | Event::AfterEach { suite, .. }
            | Event::Skipped { suite, .. }
            | Event::SuiteTeardown { suite } => suite,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Constructed { suite } => write!(f, "{}: constructed", suite),
            Event::SuiteSetup { suite } => write!(f, "{}: BeforeAll", suite),
            Event::BeforeEach { suite, case } => write!(f, "{}: BeforeEach ({})", suite, case),
            Event::CaseBody { suite, case } => write!(f, "{}: {}", suite, case),
            Event::AfterEach { suite, case } => write!(f, "{}: AfterEach ({})", suite, case),
            Event::Skipped {
                suite,
                case,
                reason,
            } => write!(f, "{}: {} skipped: {}", suite, case, reason),
            Event::SuiteTeardown { suite } => write!(f, "{}: AfterAll", suite),
        }
    }
}

/// Ordered event log for one suite run
///
/// A suite runs on a single thread, so interior mutability is enough.
#[derive(Debug, Default)]
pub struct Journal {
    events: RefCell<Vec<Event>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: Event) {
        tracing::debug!(suite = event.suite(), "{}", event);
        self.events.borrow_mut().push(event);
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events.into_inner()
    }
}
