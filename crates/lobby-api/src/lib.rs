//! JSON API serving server-authoritative reveal decisions.
//!
//! Exposes an axum [`Router`] backed by any [`TripSource`]. Every gated
//! record goes through the shared [`RevealPolicy`] before it is serialised.
//! Authentication is the caller's concern; the `role` query parameter is
//! trusted as given by the identity layer in front of this router.

pub mod error;
pub mod handlers;
pub mod memory;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use lobby_core::{
  policy::{RevealPolicy, Role},
  source::TripSource,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use handlers::{reveal, trips, views};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `LOBBY_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:      String,
  pub port:      u16,
  /// JSON snapshot of trips and schedule items to serve.
  pub seed_path: Option<PathBuf>,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub source: Arc<S>,
  pub policy: RevealPolicy,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      source: Arc::clone(&self.source),
      policy: self.policy.clone(),
    }
  }
}

/// `?role=admin|member`; members by default.
#[derive(Debug, Default, Deserialize)]
pub struct ViewerParams {
  #[serde(default)]
  pub role: Role,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: TripSource + 'static,
{
  Router::new()
    .route("/trips",                  get(trips::list::<S>))
    .route("/trips/{id}/reveal",      get(reveal::report::<S>))
    .route("/trips/{id}/tickets",     get(views::tickets::<S>))
    .route("/trips/{id}/destination", get(views::destination::<S>))
    .route("/trips/{id}/schedule",    get(views::schedule::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
