//! Refresh cadence configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::{Error, Result};

/// How often watches re-evaluate.
///
/// Reveal thresholds are hour-granular, so a minute is plenty for state;
/// countdown displays tick every second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
  pub reveal_interval_secs:    u64,
  pub countdown_interval_secs: u64,
}

impl Default for RefreshConfig {
  fn default() -> Self {
    Self { reveal_interval_secs: 60, countdown_interval_secs: 1 }
  }
}

impl RefreshConfig {
  pub fn reveal_interval(&self) -> Duration {
    Duration::from_secs(self.reveal_interval_secs)
  }

  pub fn countdown_interval(&self) -> Duration {
    Duration::from_secs(self.countdown_interval_secs)
  }

  /// `tokio::time::interval` panics on a zero period; reject it up front.
  pub fn validate(&self) -> Result<()> {
    if self.reveal_interval_secs == 0 {
      return Err(Error::ZeroInterval("reveal"));
    }
    if self.countdown_interval_secs == 0 {
      return Err(Error::ZeroInterval("countdown"));
    }
    Ok(())
  }
}
