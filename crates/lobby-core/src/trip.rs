//! Trip and schedule records as supplied by the data layer.
//!
//! Only the fields the reveal engine and its redacted views consume are
//! modelled. Timestamps stay as the raw ISO-8601 strings the data layer hands
//! over; they are parsed here, at the boundary, and never inside the reveal
//! predicates.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Records ─────────────────────────────────────────────────────────────────

/// A trip lobby. `departure_time` is unset until an admin schedules it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRecord {
  pub trip_id:        Uuid,
  pub name:           String,
  #[serde(default)]
  pub departure_time: Option<String>,
  #[serde(default)]
  pub destination:    Option<Destination>,
  #[serde(default)]
  pub tickets:        Vec<Ticket>,
}

/// Where the group is going.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
  pub city:         String,
  pub country:      String,
  /// Coarse location, e.g. "Southern Europe" or "the coast".
  pub region_hint:  Option<String>,
  /// Packing hint shown before the destination itself, e.g. "sunny, 24°C".
  pub weather_hint: Option<String>,
}

/// A travel ticket uploaded by an admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
  pub ticket_id:   Uuid,
  /// Member the ticket belongs to.
  pub holder:      String,
  /// Boarding QR payload; the first thing members get to see.
  pub qr_payload:  String,
  pub carrier:     Option<String>,
  pub origin:      Option<String>,
  pub destination: Option<String>,
  pub seat:        Option<String>,
  /// Booking reference or ticket number.
  pub reference:   Option<String>,
}

/// One entry on the trip schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleItem {
  pub item_id:    Uuid,
  pub trip_id:    Uuid,
  pub title:      String,
  #[serde(default)]
  pub location:   Option<String>,
  pub start_time: String,
  #[serde(default)]
  pub end_time:   Option<String>,
}

impl TripRecord {
  /// Parsed departure time. `Ok(None)` when none has been set.
  pub fn departure_at(&self) -> Result<Option<DateTime<Utc>>> {
    optional_timestamp("departure_time", self.departure_time.as_deref())
  }
}

impl ScheduleItem {
  pub fn start_at(&self) -> Result<DateTime<Utc>> {
    parse_timestamp("start_time", &self.start_time)
  }

  pub fn end_at(&self) -> Result<Option<DateTime<Utc>>> {
    optional_timestamp("end_time", self.end_time.as_deref())
  }
}

// ─── Timestamp parsing ───────────────────────────────────────────────────────

/// Parse a data-layer timestamp.
///
/// Accepts RFC 3339 (`2026-01-15T14:00:00Z`), the Postgres text form
/// (`2026-01-15 14:00:00+00`), and offset-less form input
/// (`2026-01-15T14:00`), which is read as UTC.
pub fn parse_timestamp(field: &'static str, raw: &str) -> Result<DateTime<Utc>> {
  let trimmed = raw.trim();
  let rfc3339 = DateTime::parse_from_rfc3339(trimmed);
  if let Ok(dt) = rfc3339 {
    return Ok(dt.with_timezone(&Utc));
  }
  if let Ok(dt) = DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f%#z") {
    return Ok(dt.with_timezone(&Utc));
  }
  for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
      return Ok(naive.and_utc());
    }
  }
  rfc3339
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|source| Error::InvalidTimestamp {
      field,
      value: raw.to_owned(),
      source,
    })
}

fn optional_timestamp(
  field: &'static str,
  raw: Option<&str>,
) -> Result<Option<DateTime<Utc>>> {
  match raw.map(str::trim) {
    None | Some("") => Ok(None),
    Some(s) => parse_timestamp(field, s).map(Some),
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn expected() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 14, 0, 0).unwrap()
  }

  #[test]
  fn parses_rfc3339_with_offset() {
    assert_eq!(parse_timestamp("t", "2026-01-15T14:00:00Z").unwrap(), expected());
    assert_eq!(
      parse_timestamp("t", "2026-01-15T15:00:00+01:00").unwrap(),
      expected()
    );
  }

  #[test]
  fn parses_postgres_text_form() {
    assert_eq!(parse_timestamp("t", "2026-01-15 14:00:00+00").unwrap(), expected());
  }

  #[test]
  fn offsetless_input_is_utc() {
    assert_eq!(parse_timestamp("t", "2026-01-15T14:00").unwrap(), expected());
  }

  #[test]
  fn garbage_is_rejected_with_field_name() {
    let err = parse_timestamp("departure_time", "next tuesday").unwrap_err();
    assert!(matches!(err, Error::InvalidTimestamp { field: "departure_time", .. }));
  }

  #[test]
  fn empty_departure_is_unset() {
    let trip = TripRecord {
      trip_id:        Uuid::nil(),
      name:           "Ski weekend".into(),
      departure_time: Some("  ".into()),
      destination:    None,
      tickets:        vec![],
    };
    assert!(trip.departure_at().unwrap().is_none());
  }
}
