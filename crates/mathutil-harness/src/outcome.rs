//! Outcome signaling for hooks and test bodies
//!
//! A failed comparison and an unmet precondition are two different things and
//! travel as two different types. [`Interrupt`] only exists so a single body
//! can `?` both.

use thiserror::Error;

/// An assertion failure: the case ran and produced a wrong result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct Failure {
    pub message: String,
}

impl Failure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// An assumption violation: the case could not meaningfully run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Assumption failed: {message}")]
pub struct Aborted {
    pub message: String,
}

impl Aborted {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Early exit from a hook or test body
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Interrupt {
    #[error(transparent)]
    Failed(#[from] Failure),

    #[error(transparent)]
    Aborted(#[from] Aborted),
}

impl Interrupt {
    pub fn is_abort(&self) -> bool {
        matches!(self, Interrupt::Aborted(_))
    }
}

/// What every hook and test body returns
pub type Outcome = Result<(), Interrupt>;
