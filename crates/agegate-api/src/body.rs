//! Request body shared by `/evaluate` and `/claims`.

use agegate_core::{
  EvaluationRequest, Policy,
  date::{deserialize_opt_instant, deserialize_opt_text},
};
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

use crate::error::ApiError;

/// A policy given either by name (`"over21"`, `"under:18"`) or in full
/// (`{"kind": "under", "threshold_years": 18}`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PolicyInput {
  Named(String),
  Inline(Policy),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EvaluateBody {
  /// Non-string values read as a missing birthdate.
  #[serde(default, deserialize_with = "deserialize_opt_text")]
  pub birthdate:      Option<String>,
  /// RFC 3339, a naive timestamp (UTC), or a bare date.
  #[serde(default, deserialize_with = "deserialize_opt_instant")]
  pub reference_time: Option<DateTime<FixedOffset>>,
  /// Absent means the server's default policy.
  #[serde(default)]
  pub policy:         Option<PolicyInput>,
}

impl EvaluateBody {
  pub fn resolve_policy(&self, default: Policy) -> Result<Policy, ApiError> {
    match &self.policy {
      None => Ok(default),
      Some(PolicyInput::Inline(p)) => Ok(*p),
      Some(PolicyInput::Named(name)) => Ok(name.parse::<Policy>()?),
    }
  }

  pub fn request(&self) -> EvaluationRequest {
    EvaluationRequest {
      birthdate:      self.birthdate.clone(),
      reference_time: self.reference_time,
    }
  }
}
