//! Subject: the person an evaluation is about.
//!
//! Only the birthdate matters to a policy. The serialised shape matches the
//! `{"name": ..., "dob": ...}` user records that callers hand over.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::{
  EvaluationResult, Policy, date::deserialize_opt_text, evaluate_age_policy,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name:      Option<String>,
  /// Raw birthdate string as supplied; parsed at evaluation time.
  #[serde(
    default,
    rename = "dob",
    alias = "birthdate",
    deserialize_with = "deserialize_opt_text"
  )]
  pub birthdate: Option<String>,
}

impl Subject {
  pub fn evaluate(
    &self,
    policy: Policy,
    reference_time: Option<DateTime<FixedOffset>>,
  ) -> EvaluationResult {
    match &self.birthdate {
      Some(b) => evaluate_age_policy(b, policy, reference_time),
      None => EvaluationResult::default(),
    }
  }
}
