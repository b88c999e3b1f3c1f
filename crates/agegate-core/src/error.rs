//! Error types for `agegate-core`.
//!
//! None of these are raised for bad birthdates; those become reason codes.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  #[error("unknown policy kind: {0:?}")]
  UnknownPolicyKind(String),

  #[error("invalid threshold: {0:?}")]
  InvalidThreshold(String),

  #[error("unknown reason code: {0:?}")]
  UnknownReason(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
