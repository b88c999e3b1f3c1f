//! `POST /claims`. Body: [`EvaluateBody`]; returns `201` with an
//! [`AgeClaim`], or `422` when the birthdate cannot back a claim.

use std::sync::Arc;

use agegate_claim::AgeClaim;
use agegate_core::Reason;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;

use crate::{ApiState, body::EvaluateBody, error::ApiError, extract::ApiJson};

pub async fn create(
  State(state): State<Arc<ApiState>>,
  ApiJson(body): ApiJson<EvaluateBody>,
) -> Result<impl IntoResponse, ApiError> {
  let policy = body.resolve_policy(state.default_policy)?;
  let birthdate = body.birthdate.as_deref().ok_or_else(|| {
    ApiError::Unprocessable {
      message: "birthdate is required".to_string(),
      reason:  Reason::InvalidOrMissingBirthdate,
    }
  })?;
  let reference = body
    .reference_time
    .unwrap_or_else(|| Utc::now().fixed_offset());

  let claim = AgeClaim::issue(birthdate, policy, reference).inspect_err(|e| {
    tracing::warn!(%policy, error = %e, "refused to issue age claim");
  })?;

  tracing::info!(
    claim_id = %claim.claim_id,
    %policy,
    decision = claim.decision,
    "issued age claim"
  );
  Ok((StatusCode::CREATED, Json(claim)))
}
