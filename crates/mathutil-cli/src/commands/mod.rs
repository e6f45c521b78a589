//! Command implementations

pub mod calc;
