//! Data validation engine.
//!
//! Provides rule types, a pure-logic evaluator and the payload boundary
//! that turns untyped input into typed records.

pub mod evaluator;
pub mod rules;
pub mod submission;
