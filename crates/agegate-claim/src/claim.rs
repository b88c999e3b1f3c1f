//! The `AgeVerification` claim document.
//!
//! A claim records one evaluation: who (by birth date), under which policy,
//! when, and with what outcome. Its `digest` is a SHA-256 over every other
//! field, so any edit to a stored claim is detectable with
//! [`AgeClaim::verify_digest`].

use agegate_core::{Policy, Reason, parse_date_value};
use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::{Error, Result};

pub const CLAIM_TYPE: &str = "AgeVerification";
pub const CLAIM_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeClaim {
  #[serde(rename = "type")]
  pub claim_type:        String,
  pub version:           String,
  pub claim_id:          String,
  pub date_of_birth:     NaiveDate,
  pub policy:            Policy,
  pub decision:          bool,
  pub reason:            Reason,
  pub verification_date: DateTime<FixedOffset>,
  /// Hex SHA-256 over all other fields.
  pub digest:            String,
}

impl AgeClaim {
  /// Evaluate `birthdate` at `reference` and record the outcome under a fresh
  /// claim id.
  ///
  /// Fails when the birthdate is unusable or lies in the future; a policy
  /// that is simply not met still yields a claim with `decision: false`.
  pub fn issue(
    birthdate: &str,
    policy: Policy,
    reference: DateTime<FixedOffset>,
  ) -> Result<Self> {
    Self::issue_with_id(Uuid::new_v4(), birthdate, policy, reference)
  }

  pub fn issue_with_id(
    id: Uuid,
    birthdate: &str,
    policy: Policy,
    reference: DateTime<FixedOffset>,
  ) -> Result<Self> {
    let date_of_birth = parse_date_value(birthdate)?.calendar_date();
    let result = policy.evaluate_date(date_of_birth, reference.date_naive());
    if result.reason == Reason::BirthdateInFuture {
      return Err(Error::BirthdateInFuture);
    }

    let mut claim = Self {
      claim_type: CLAIM_TYPE.to_string(),
      version: CLAIM_VERSION.to_string(),
      claim_id: format!("age_claim_{}", id.simple()),
      date_of_birth,
      policy,
      decision: result.decision,
      reason: result.reason,
      verification_date: reference,
      digest: String::new(),
    };
    claim.digest = claim.compute_digest();
    Ok(claim)
  }

  /// Parse a claim previously produced by [`AgeClaim::to_json_pretty`].
  pub fn from_json(input: &str) -> Result<Self> {
    Ok(serde_json::from_str(input)?)
  }

  pub fn to_json_pretty(&self) -> Result<String> {
    Ok(serde_json::to_string_pretty(self)?)
  }

  /// Recompute the digest from the current field values.
  pub fn compute_digest(&self) -> String {
    let mut hasher = Sha256::new();
    for field in [
      self.claim_type.as_str(),
      self.version.as_str(),
      self.claim_id.as_str(),
    ] {
      update_str(&mut hasher, field);
    }
    update_str(&mut hasher, &self.date_of_birth.format("%Y-%m-%d").to_string());
    update_str(&mut hasher, self.policy.kind.as_str());
    hasher.update(self.policy.threshold_years.to_le_bytes());
    hasher.update([u8::from(self.decision)]);
    update_str(&mut hasher, self.reason.as_str());
    update_str(
      &mut hasher,
      &self
        .verification_date
        .to_rfc3339_opts(SecondsFormat::AutoSi, true),
    );
    hex::encode(hasher.finalize())
  }

  /// True if `digest` matches the other fields.
  pub fn verify_digest(&self) -> bool { self.digest == self.compute_digest() }
}

/// Length-prefixed so that adjacent fields cannot run into each other.
fn update_str(hasher: &mut Sha256, s: &str) {
  hasher.update((s.len() as u64).to_le_bytes());
  hasher.update(s.as_bytes());
}
