//! lobby-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) layered with
//! `LOBBY_*` environment variables, loads the trip seed file, and serves the
//! reveal API over HTTP.
//!
//! ```toml
//! host      = "127.0.0.1"
//! port      = 8080
//! seed_path = "~/lobby/seed.json"
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use lobby_api::{AppState, ServerConfig, memory::MemoryTrips};
use lobby_core::policy::RevealPolicy;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Lobby reveal API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .set_default("host", "127.0.0.1")?
    .set_default("port", 8080)?
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("LOBBY"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let source = match &server_cfg.seed_path {
    Some(path) => {
      let path = expand_tilde(path);
      let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read seed file {path:?}"))?;
      MemoryTrips::from_json(&raw)
        .with_context(|| format!("failed to parse seed file {path:?}"))?
    }
    None => {
      tracing::warn!("no seed_path configured; serving an empty trip list");
      MemoryTrips::default()
    }
  };
  tracing::info!(trips = source.trip_count(), "trip source loaded");

  let state = AppState {
    source: Arc::new(source),
    policy: RevealPolicy::system(),
  };

  let app = lobby_api::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
