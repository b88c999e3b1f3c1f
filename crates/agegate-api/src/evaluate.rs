//! `POST /evaluate`. Body: [`EvaluateBody`]; always `200` with
//! `{"decision": bool, "reason": "<code>"}` once the policy resolves.

use std::sync::Arc;

use agegate_core::EvaluationResult;
use axum::{Json, extract::State};

use crate::{ApiState, body::EvaluateBody, error::ApiError, extract::ApiJson};

pub async fn handler(
  State(state): State<Arc<ApiState>>,
  ApiJson(body): ApiJson<EvaluateBody>,
) -> Result<Json<EvaluationResult>, ApiError> {
  let policy = body.resolve_policy(state.default_policy)?;
  let result = body.request().evaluate(policy);

  tracing::debug!(
    %policy,
    decision = result.decision,
    reason = %result.reason,
    "evaluated age policy"
  );
  Ok(Json(result))
}
