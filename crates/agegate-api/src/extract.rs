//! JSON body extractor whose rejections go through [`ApiError`].
//!
//! Plain [`axum::Json`] answers malformed bodies with its own plain-text
//! responses; handlers here take [`ApiJson`] so every failure is a JSON
//! `{"error": ...}` with status `400`.

use axum::{
  Json,
  extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
  T: DeserializeOwned,
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    let Json(value) = Json::<T>::from_request(req, state).await?;
    Ok(Self(value))
  }
}

impl From<JsonRejection> for ApiError {
  fn from(e: JsonRejection) -> Self { ApiError::BadRequest(e.body_text()) }
}
