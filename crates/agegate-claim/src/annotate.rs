//! Write an eligibility decision back into a JSON user record.
//!
//! Input records look like `{"user": {"name": "...", "dob": "YYYY-MM-DD"}}`.
//! For `at_least(21)` the user object gains `is_over_21` and
//! `is_over_21_reason`; other policies use their own label.

use agegate_core::{EvaluationResult, Policy, Subject};
use chrono::{DateTime, FixedOffset};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Annotate one record in place and return the evaluation.
///
/// A missing or non-string `dob` is evaluated as missing rather than
/// rejected; only a record without a `user` object is an error.
pub fn annotate_record(
  record: &mut Value,
  policy: Policy,
  reference: DateTime<FixedOffset>,
) -> Result<EvaluationResult> {
  let user = user_object(record)?;

  let subject = Subject {
    name:      None,
    birthdate: user.get("dob").and_then(Value::as_str).map(str::to_string),
  };
  let result = subject.evaluate(policy, Some(reference));

  let key = format!("is_{}", policy.label());
  user.insert(format!("{key}_reason"), Value::from(result.reason.as_str()));
  user.insert(key, Value::Bool(result.decision));

  Ok(result)
}

/// Annotate either a single record or an array of records.
///
/// Stops at the first record that is structurally wrong.
pub fn annotate_records(
  document: &mut Value,
  policy: Policy,
  reference: DateTime<FixedOffset>,
) -> Result<Vec<EvaluationResult>> {
  match document {
    Value::Array(records) => records
      .iter_mut()
      .map(|r| annotate_record(r, policy, reference))
      .collect(),
    other => Ok(vec![annotate_record(other, policy, reference)?]),
  }
}

fn user_object(record: &mut Value) -> Result<&mut Map<String, Value>> {
  let root = record
    .as_object_mut()
    .ok_or_else(|| Error::NotAnObject("$".to_string()))?;
  root
    .get_mut("user")
    .ok_or(Error::MissingField("user"))?
    .as_object_mut()
    .ok_or_else(|| Error::NotAnObject("$.user".to_string()))
}
