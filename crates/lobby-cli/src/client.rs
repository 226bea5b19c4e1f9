//! Async HTTP client for the lobby reveal API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use lobby_core::policy::{RevealReport, Role};
use reqwest::Client;
use uuid::Uuid;

/// Connection settings for the lobby API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  /// `GET /trips/<id>/reveal?role=<role>`
  pub async fn reveal_report(&self, trip_id: Uuid, role: Role) -> Result<RevealReport> {
    let path = format!("/trips/{trip_id}/reveal");
    let resp = self
      .client
      .get(self.url(&path))
      .query(&[("role", role.to_string())])
      .send()
      .await
      .with_context(|| format!("GET {path} failed"))?;

    if !resp.status().is_success() {
      return Err(anyhow!("GET {path} → {}", resp.status()));
    }
    resp.json().await.context("deserialising reveal report")
  }
}
