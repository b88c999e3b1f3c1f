//! The age-eligibility decision.
//!
//! Age is computed on calendar dates, never on elapsed durations: a subject
//! is N years old from the N-th recurrence of their birth month and day.
//! Time of day plays no part. A 29 February birthday is reached on 1 March
//! in non-leap years, which falls out of comparing `(month, day)` directly.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Policy, PolicyKind, Reason,
  date::{deserialize_opt_instant, deserialize_opt_text, parse_date_value},
};

// ─── Result ──────────────────────────────────────────────────────────────────

/// A decision and the reason for it. Both fields are always set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EvaluationResult {
  pub decision: bool,
  pub reason:   Reason,
}

/// The value every evaluation starts from before validation runs.
impl Default for EvaluationResult {
  fn default() -> Self {
    Self {
      decision: false,
      reason:   Reason::InvalidOrMissingBirthdate,
    }
  }
}

impl EvaluationResult {
  fn denied(reason: Reason) -> Self {
    Self {
      decision: false,
      reason,
    }
  }
}

// ─── Calendar age ────────────────────────────────────────────────────────────

/// Whole years between `birth` and `on`, or `None` if `birth` is later.
pub fn calendar_age(birth: NaiveDate, on: NaiveDate) -> Option<u32> {
  if birth > on {
    return None;
  }
  // birth <= on, so a decrement only happens when on.year > birth.year.
  let mut years = (on.year() - birth.year()) as u32;
  if (on.month(), on.day()) < (birth.month(), birth.day()) {
    years -= 1;
  }
  Some(years)
}

// ─── Evaluation ──────────────────────────────────────────────────────────────

impl Policy {
  /// Evaluate an already-parsed birth date against a reference date.
  pub fn evaluate_date(&self, birth: NaiveDate, on: NaiveDate) -> EvaluationResult {
    let Some(age) = calendar_age(birth, on) else {
      return EvaluationResult::denied(Reason::BirthdateInFuture);
    };

    if self.admits(age) {
      EvaluationResult {
        decision: true,
        reason:   Reason::Ok,
      }
    } else {
      EvaluationResult::denied(match self.kind {
        PolicyKind::AtLeast => Reason::UnderThreshold,
        PolicyKind::Under => Reason::AgeIsThresholdOrOver,
      })
    }
  }

  /// Evaluate a birthdate string at `reference`.
  ///
  /// Never fails: unusable input is reported through
  /// [`Reason::InvalidOrMissingBirthdate`]. The reference date is the
  /// calendar date of `reference` in its own offset.
  pub fn evaluate(
    &self,
    birthdate: &str,
    reference: DateTime<FixedOffset>,
  ) -> EvaluationResult {
    let Ok(birth) = parse_date_value(birthdate) else {
      return EvaluationResult::default();
    };
    self.evaluate_date(birth.calendar_date(), reference.date_naive())
  }
}

/// Evaluate `birthdate` under `policy`, sampling the clock once if no
/// reference time is given.
pub fn evaluate_age_policy(
  birthdate: &str,
  policy: Policy,
  reference_time: Option<DateTime<FixedOffset>>,
) -> EvaluationResult {
  let reference = reference_time.unwrap_or_else(|| Utc::now().fixed_offset());
  policy.evaluate(birthdate, reference)
}

// ─── Request ─────────────────────────────────────────────────────────────────

/// Caller-supplied input. Both fields are optional on the wire; a missing
/// birthdate is an ordinary denial, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRequest {
  #[serde(default, deserialize_with = "deserialize_opt_text")]
  pub birthdate:      Option<String>,
  #[serde(default, deserialize_with = "deserialize_opt_instant")]
  pub reference_time: Option<DateTime<FixedOffset>>,
}

impl EvaluationRequest {
  pub fn new(birthdate: impl Into<String>) -> Self {
    Self {
      birthdate:      Some(birthdate.into()),
      reference_time: None,
    }
  }

  pub fn at(mut self, reference_time: DateTime<FixedOffset>) -> Self {
    self.reference_time = Some(reference_time);
    self
  }

  pub fn evaluate(&self, policy: Policy) -> EvaluationResult {
    match &self.birthdate {
      Some(b) => evaluate_age_policy(b, policy, self.reference_time),
      None => EvaluationResult::default(),
    }
  }
}
