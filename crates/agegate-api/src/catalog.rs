//! Read-only listings of the reason-code set and the policy presets.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/reasons` | `[{"code", "description"}]` |
//! | `GET`  | `/policies` | `[{"name", "policy", "default"}]` |

use std::sync::Arc;

use agegate_core::{Policy, Reason};
use axum::{Json, extract::State};
use serde::Serialize;

use crate::ApiState;

#[derive(Debug, Serialize)]
pub struct ReasonEntry {
  pub code:        Reason,
  pub description: &'static str,
}

/// `GET /reasons`
pub async fn reasons() -> Json<Vec<ReasonEntry>> {
  Json(
    Reason::ALL
      .into_iter()
      .map(|code| ReasonEntry {
        code,
        description: code.description(),
      })
      .collect(),
  )
}

#[derive(Debug, Serialize)]
pub struct PolicyEntry {
  pub name:    &'static str,
  pub policy:  Policy,
  /// Whether requests without a `policy` field use this one.
  pub default: bool,
}

/// `GET /policies`
pub async fn policies(
  State(state): State<Arc<ApiState>>,
) -> Json<Vec<PolicyEntry>> {
  Json(
    Policy::presets()
      .into_iter()
      .map(|(name, policy)| PolicyEntry {
        name,
        policy,
        default: policy == state.default_policy,
      })
      .collect(),
  )
}
