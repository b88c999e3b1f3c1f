//! API error type and [`axum::response::IntoResponse`] implementation.

use agegate_core::Reason;
use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
///
/// Evaluation itself never produces one of these; a bad birthdate on
/// `/evaluate` is a normal `200` with a reason code.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  /// The input was well-formed JSON but cannot back a claim.
  #[error("unprocessable: {message}")]
  Unprocessable { message: String, reason: Reason },

  #[error("internal error: {0}")]
  Internal(String),
}

impl From<agegate_core::Error> for ApiError {
  fn from(e: agegate_core::Error) -> Self { ApiError::BadRequest(e.to_string()) }
}

impl From<agegate_claim::Error> for ApiError {
  fn from(e: agegate_claim::Error) -> Self {
    use agegate_claim::Error as E;
    let reason = match &e {
      E::Birthdate(_) => Reason::InvalidOrMissingBirthdate,
      E::BirthdateInFuture => Reason::BirthdateInFuture,
      _ => return ApiError::Internal(e.to_string()),
    };
    ApiError::Unprocessable {
      message: e.to_string(),
      reason,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::BadRequest(m) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": m }))).into_response()
      }
      ApiError::Unprocessable { message, reason } => (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "error": message, "reason": reason })),
      )
        .into_response(),
      ApiError::Internal(m) => {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": m })))
          .into_response()
      }
    }
  }
}
