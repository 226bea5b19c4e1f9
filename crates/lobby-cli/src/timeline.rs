//! Targets supplied on the command line, and the one-shot `status` view.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use clap::Args;
use lobby_core::{
  clock::{Clock, FixedClock, SystemClock},
  policy::{RevealPolicy, Role},
  trip::{ScheduleItem, TripRecord, parse_timestamp},
};
use uuid::Uuid;

use crate::render;

/// Reveal targets given as flags. Timestamps are validated here, before they
/// reach the policy.
#[derive(Args, Debug, Clone)]
pub struct TimelineArgs {
  /// Trip departure time (ISO-8601). Omit for an unscheduled trip.
  #[arg(long, value_parser = parse_departure)]
  pub departure: Option<DateTime<Utc>>,

  /// Schedule item start time; repeat for several activities.
  #[arg(long = "activity", value_name = "START", value_parser = parse_start)]
  pub activities: Vec<DateTime<Utc>>,

  /// Viewer role.
  #[arg(long, default_value_t = Role::Member)]
  pub role: Role,
}

fn parse_departure(raw: &str) -> lobby_core::Result<DateTime<Utc>> {
  parse_timestamp("departure", raw)
}

fn parse_start(raw: &str) -> lobby_core::Result<DateTime<Utc>> {
  parse_timestamp("activity", raw)
}

impl TimelineArgs {
  /// The flags as data-layer records, so they flow through the same policy
  /// entry points as API data.
  pub fn records(&self) -> (TripRecord, Vec<ScheduleItem>) {
    let trip_id = Uuid::new_v4();
    let iso = |t: &DateTime<Utc>| t.to_rfc3339_opts(SecondsFormat::Secs, true);
    let trip = TripRecord {
      trip_id,
      name: "command line".into(),
      departure_time: self.departure.as_ref().map(iso),
      destination: None,
      tickets: vec![],
    };
    let items = self
      .activities
      .iter()
      .map(|start| ScheduleItem {
        item_id: Uuid::new_v4(),
        trip_id,
        title: String::new(),
        location: None,
        start_time: iso(start),
        end_time: None,
      })
      .collect();
    (trip, items)
  }
}

/// Render the timeline as seen at `at` (or now).
pub fn status(args: &TimelineArgs, at: Option<DateTime<Utc>>) -> Vec<String> {
  let clock: Arc<dyn Clock> = match at {
    Some(t) => Arc::new(FixedClock(t)),
    None => Arc::new(SystemClock),
  };
  let (trip, items) = args.records();
  render::report(&RevealPolicy::new(clock).report(&trip, &items, args.role))
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn args(departure: Option<&str>, role: Role) -> TimelineArgs {
    TimelineArgs {
      departure: departure.map(|d| parse_departure(d).unwrap()),
      activities: vec![parse_start("2026-01-15T20:00:00Z").unwrap()],
      role,
    }
  }

  #[test]
  fn status_matches_member_timeline() {
    let at = Utc.with_ymd_and_hms(2026, 1, 15, 11, 30, 0).unwrap();
    let lines = status(&args(Some("2026-01-15T14:00:00Z"), Role::Member), Some(at));
    assert!(lines[1].contains("qr_only"), "{lines:?}");
    assert!(lines[1].contains("1h 30m 0s"), "{lines:?}");
    assert!(lines[2].contains("approximate"), "{lines:?}");
    assert!(lines[3].contains("hidden"), "{lines:?}");
  }

  #[test]
  fn unscheduled_trip_is_reported_as_such() {
    let at = Utc.with_ymd_and_hms(2026, 1, 15, 11, 30, 0).unwrap();
    let lines = status(&args(None, Role::Admin), Some(at));
    assert!(lines[1].ends_with("not yet scheduled"), "{lines:?}");
  }

  #[test]
  fn bad_timestamp_is_rejected_at_the_flag() {
    assert!(parse_departure("tomorrow-ish").is_err());
  }
}
