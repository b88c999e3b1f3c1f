//! `agegate serve`: runs the HTTP API until interrupted.

use agegate_api::{ApiState, api_router};
use agegate_core::Policy;
use anyhow::Context as _;
use tokio::net::TcpListener;

use crate::settings::ServerConfig;

pub async fn run(cfg: ServerConfig) -> anyhow::Result<()> {
  let default_policy = cfg
    .default_policy
    .parse::<Policy>()
    .with_context(|| format!("invalid default_policy {:?}", cfg.default_policy))?;

  let app = api_router(ApiState { default_policy });
  let address = format!("{}:{}", cfg.host, cfg.port);

  tracing::info!(%default_policy, "Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  tracing::info!("server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(error = %e, "failed to listen for ctrl-c");
  }
}
