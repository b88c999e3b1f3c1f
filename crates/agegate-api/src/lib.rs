//! JSON REST API for age-eligibility checks.
//!
//! Exposes an axum [`Router`] over [`agegate_core`] and [`agegate_claim`].
//! Callers such as a browser extension post a birthdate and get back
//! `{decision, reason}`. Auth, TLS, and persistence of decisions are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", agegate_api::api_router(ApiState::default()))
//! ```

mod body;
pub mod catalog;
pub mod claims;
pub mod error;
pub mod evaluate;
pub mod extract;

use std::sync::Arc;

use agegate_core::Policy;
use axum::{
  Router,
  routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use body::{EvaluateBody, PolicyInput};
pub use error::ApiError;
pub use extract::ApiJson;

/// Shared, read-only handler state.
#[derive(Debug, Clone)]
pub struct ApiState {
  /// Applied when a request names no policy.
  pub default_policy: Policy,
}

impl Default for ApiState {
  fn default() -> Self {
    Self {
      default_policy: Policy::OVER_21,
    }
  }
}

/// Build the API router.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router(state: ApiState) -> Router<()> {
  Router::new()
    .route("/evaluate", post(evaluate::handler))
    .route("/claims", post(claims::create))
    .route("/reasons", get(catalog::reasons))
    .route("/policies", get(catalog::policies))
    .with_state(Arc::new(state))
    .layer(TraceLayer::new_for_http())
}
