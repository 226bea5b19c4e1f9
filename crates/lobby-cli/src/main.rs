//! `lobby` — reveal countdowns for a trip lobby.
//!
//! # Usage
//!
//! ```text
//! lobby status --departure 2026-01-15T14:00:00Z --activity 2026-01-15T20:00:00Z
//! lobby status --departure 2026-01-15T14:00:00Z --at 2026-01-15T11:30:00Z
//! lobby watch  --departure 2026-01-15T14:00:00Z --role member
//! lobby remote --trip <uuid> --url http://localhost:8080
//! ```

mod client;
mod render;
mod timeline;
mod watch;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use lobby_core::{clock::SystemClock, policy::Role, trip::parse_timestamp};
use lobby_refresh::{RefreshConfig, RefreshScheduler};
use serde::Deserialize;
use timeline::TimelineArgs;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "lobby", about = "Reveal countdowns for a trip lobby")]
struct Args {
  /// Path to a TOML config file (url, [refresh] intervals).
  #[arg(short, long, value_name = "FILE", global = true)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Print what a viewer can see right now (or at `--at`).
  Status {
    #[command(flatten)]
    timeline: TimelineArgs,

    /// Evaluate at this instant instead of now.
    #[arg(long, value_parser = parse_at)]
    at: Option<DateTime<Utc>>,
  },

  /// Keep the countdown live until Ctrl-C.
  Watch {
    #[command(flatten)]
    timeline: TimelineArgs,
  },

  /// Fetch a server-computed reveal report.
  Remote {
    #[arg(long)]
    trip: Uuid,

    /// Base URL of the lobby server (default: http://localhost:8080).
    #[arg(long, env = "LOBBY_URL")]
    url: Option<String>,

    #[arg(long, default_value_t = Role::Member)]
    role: Role,
  },
}

fn parse_at(raw: &str) -> lobby_core::Result<DateTime<Utc>> {
  parse_timestamp("at", raw)
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:     String,
  #[serde(default)]
  refresh: RefreshConfig,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  match args.command {
    Command::Status { timeline: targets, at } => {
      for line in timeline::status(&targets, at) {
        println!("{line}");
      }
    }
    Command::Watch { timeline: targets } => {
      let scheduler = RefreshScheduler::new(Arc::new(SystemClock), file_cfg.refresh)
        .context("invalid refresh configuration")?;
      watch::run(scheduler, targets).await?;
    }
    Command::Remote { trip, url, role } => {
      // CLI flag overrides config file, which overrides the default.
      let base_url = url
        .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
        .unwrap_or_else(|| "http://localhost:8080".to_string());
      let client = ApiClient::new(ApiConfig { base_url })?;
      let report = client.reveal_report(trip, role).await?;
      for line in render::report(&report) {
        println!("{line}");
      }
    }
  }

  Ok(())
}
