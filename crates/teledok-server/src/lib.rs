//! HTTP server wiring for the Teledok registry.
//!
//! Wraps [`teledok_api::api_router`] with a health check, request tracing and
//! request ids. The binary in `main.rs` adds configuration and the listener.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use axum::{Router, http::HeaderName, routing::get};
use serde::Deserialize;
use teledok_core::store::RegistryStore;
use tower_http::{
  request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
  trace::TraceLayer,
};

pub const ENV_PREFIX: &str = "TELEDOK";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `TELEDOK_*` environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "127.0.0.1".into(),
      port:       5000,
      store_path: PathBuf::from("teledok.db"),
    }
  }
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Values given on the command line; they win over file and environment.
#[derive(Debug, Default)]
pub struct Overrides {
  pub host:       Option<String>,
  pub port:       Option<u16>,
  pub store_path: Option<PathBuf>,
}

/// Layer `source` (usually the config file), the environment and `overrides`.
pub fn load_config<T>(source: T, overrides: Overrides) -> anyhow::Result<ServerConfig>
where
  T: config::Source + Send + Sync + 'static,
{
  let settings = config::Config::builder()
    .add_source(source)
    .add_source(config::Environment::with_prefix(ENV_PREFIX))
    .set_override_option("host", overrides.host)?
    .set_override_option("port", overrides.port.map(i64::from))?
    .set_override_option(
      "store_path",
      overrides.store_path.map(|p| p.to_string_lossy().into_owned()),
    )?
    .build()
    .context("failed to read configuration")?;

  settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the complete application: API routes, `/health`, tracing and
/// `x-request-id` propagation.
pub fn app<S>(store: Arc<S>) -> Router
where
  S: RegistryStore + 'static,
{
  let request_id = HeaderName::from_static("x-request-id");

  Router::new()
    .route("/health", get(health))
    .merge(teledok_api::api_router(store))
    .layer(PropagateRequestIdLayer::new(request_id.clone()))
    .layer(TraceLayer::new_for_http())
    .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
}

async fn health() -> &'static str { "ok" }
