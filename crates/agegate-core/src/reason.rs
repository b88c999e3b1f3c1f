//! The closed set of reason codes attached to every evaluation.
//!
//! The literal strings are part of the public contract: callers (UIs,
//! extensions, policy documents) match on them.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
  /// Input was usable and the policy is satisfied.
  Ok,
  /// Birthdate absent, empty, or unparseable.
  InvalidOrMissingBirthdate,
  /// Birthdate falls after the reference date.
  BirthdateInFuture,
  /// Input was usable but the subject is too old for an `under` policy.
  AgeIsThresholdOrOver,
  /// Input was usable but the subject is too young for an `at_least` policy.
  UnderThreshold,
}

impl Reason {
  pub const ALL: [Reason; 5] = [
    Reason::Ok,
    Reason::InvalidOrMissingBirthdate,
    Reason::BirthdateInFuture,
    Reason::AgeIsThresholdOrOver,
    Reason::UnderThreshold,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Ok => "ok",
      Self::InvalidOrMissingBirthdate => "invalid_or_missing_birthdate",
      Self::BirthdateInFuture => "birthdate_in_future",
      Self::AgeIsThresholdOrOver => "age_is_threshold_or_over",
      Self::UnderThreshold => "under_threshold",
    }
  }

  pub fn description(&self) -> &'static str {
    match self {
      Self::Ok => "the birthdate is valid and the policy is satisfied",
      Self::InvalidOrMissingBirthdate => {
        "the birthdate is missing or could not be parsed"
      }
      Self::BirthdateInFuture => "the birthdate is after the reference date",
      Self::AgeIsThresholdOrOver => {
        "the subject has reached the threshold age of an under-N policy"
      }
      Self::UnderThreshold => {
        "the subject has not yet reached the threshold age"
      }
    }
  }

  /// True for reasons that mean the input itself was unusable.
  pub fn is_input_error(&self) -> bool {
    matches!(self, Self::InvalidOrMissingBirthdate | Self::BirthdateInFuture)
  }
}

impl fmt::Display for Reason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Reason {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    Self::ALL
      .into_iter()
      .find(|r| r.as_str() == s)
      .ok_or_else(|| Error::UnknownReason(s.to_string()))
  }
}
