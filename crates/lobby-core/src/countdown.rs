//! Countdown formatting for "time until the next threshold" displays.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Time left until an instant, broken down for display.
///
/// Anything under one second, including negative durations, is [`Now`].
///
/// [`Now`]: Countdown::Now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Countdown {
  Remaining {
    hours:   u64,
    minutes: u8,
    seconds: u8,
  },
  Now,
}

impl Countdown {
  /// Break `remaining` into hours, minutes and whole seconds.
  /// Sub-second remainders are truncated.
  pub fn from_remaining(remaining: TimeDelta) -> Self {
    let total = remaining.num_seconds();
    if total <= 0 {
      return Self::Now;
    }
    let total = total as u64;
    Self::Remaining {
      hours:   total / 3600,
      minutes: (total % 3600 / 60) as u8,
      seconds: (total % 60) as u8,
    }
  }

  /// Countdown from `now` to `instant`.
  pub fn until(now: DateTime<Utc>, instant: DateTime<Utc>) -> Self {
    Self::from_remaining(instant - now)
  }

  pub fn is_now(&self) -> bool { matches!(self, Self::Now) }
}

impl fmt::Display for Countdown {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Remaining { hours, minutes, seconds } => {
        write!(f, "{hours}h {minutes}m {seconds}s")
      }
      Self::Now => f.write_str("Now!"),
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn formats_hours_minutes_seconds() {
    let remaining = TimeDelta::hours(2) + TimeDelta::minutes(5) + TimeDelta::seconds(9);
    assert_eq!(Countdown::from_remaining(remaining).to_string(), "2h 5m 9s");
  }

  #[test]
  fn hours_are_not_wrapped_into_days() {
    let c = Countdown::from_remaining(TimeDelta::hours(50));
    assert_eq!(c, Countdown::Remaining { hours: 50, minutes: 0, seconds: 0 });
  }

  #[test]
  fn zero_and_negative_are_now() {
    assert!(Countdown::from_remaining(TimeDelta::zero()).is_now());
    assert!(Countdown::from_remaining(TimeDelta::seconds(-30)).is_now());
    assert_eq!(Countdown::from_remaining(TimeDelta::hours(-4)).to_string(), "Now!");
  }

  #[test]
  fn sub_second_remainder_is_truncated() {
    let c = Countdown::from_remaining(TimeDelta::milliseconds(61_900));
    assert_eq!(c.to_string(), "0h 1m 1s");
    assert!(Countdown::from_remaining(TimeDelta::milliseconds(400)).is_now());
  }

  #[test]
  fn until_measures_from_now() {
    let now = Utc.with_ymd_and_hms(2026, 1, 15, 10, 59, 30).unwrap();
    let at = Utc.with_ymd_and_hms(2026, 1, 15, 11, 0, 0).unwrap();
    assert_eq!(Countdown::until(now, at).to_string(), "0h 0m 30s");
    assert!(Countdown::until(at, now).is_now());
  }

  #[test]
  fn serialises_with_status_tag() {
    let json = serde_json::to_value(Countdown::Now).unwrap();
    assert_eq!(json, serde_json::json!({ "status": "now" }));
  }
}
