//! Error types for `agegate-claim`.

use agegate_core::DateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unusable birthdate: {0}")]
  Birthdate(#[from] DateError),

  #[error("birthdate is after the verification date")]
  BirthdateInFuture,

  #[error("record is missing required field {0:?}")]
  MissingField(&'static str),

  #[error("expected a JSON object at {0:?}")]
  NotAnObject(String),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
