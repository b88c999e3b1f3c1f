//! Core types and the age-eligibility evaluator.
//!
//! This crate is deliberately free of HTTP, logging, and I/O. Every function
//! here is a pure computation over its arguments; callers that want "now"
//! sample the clock once and pass it in.

pub mod date;
pub mod error;
pub mod evaluate;
pub mod policy;
pub mod reason;
pub mod subject;

pub use date::{DateError, DateValue, parse_date_value, parse_instant};
pub use error::{Error, Result};
pub use evaluate::{
  EvaluationRequest, EvaluationResult, calendar_age, evaluate_age_policy,
};
pub use policy::{Policy, PolicyKind};
pub use reason::Reason;
pub use subject::Subject;
