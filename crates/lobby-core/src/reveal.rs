//! Reveal predicates: pure functions from `(now, target)` to a discrete stage.
//!
//! Remaining time is always the exact [`TimeDelta`] between the target and
//! `now`; nothing is rounded to fractional hours. At exactly a threshold the
//! departure and destination predicates pick the more-revealed stage. The
//! activity predicate reveals only once the start is strictly less than its
//! threshold away.
//!
//! Every predicate is monotonic in `now` and total: targets in the past
//! resolve to the maximal stage.

use std::{fmt, str::FromStr};

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::Error;

// ─── Thresholds ──────────────────────────────────────────────────────────────

/// Ticket QR code becomes visible this many seconds before departure.
pub const TICKET_QR_ONLY_SECS: i64 = 3 * 60 * 60;
/// Full ticket (and with it the destination) becomes visible.
pub const TICKET_FULL_SECS: i64 = 60 * 60;
/// Schedule items reveal once their start is closer than this.
pub const ACTIVITY_REVEAL_SECS: i64 = 60 * 60;
/// Country, region and weather hints for the destination become visible.
pub const DESTINATION_APPROXIMATE_SECS: i64 = 24 * 60 * 60;
pub const DESTINATION_FULL_SECS: i64 = TICKET_FULL_SECS;

const _: () = assert!(
  TICKET_QR_ONLY_SECS > TICKET_FULL_SECS,
  "qr_only threshold must precede the full threshold"
);
const _: () = assert!(
  DESTINATION_APPROXIMATE_SECS > DESTINATION_FULL_SECS,
  "approximate threshold must precede the full threshold"
);
const _: () = assert!(TICKET_FULL_SECS > 0 && ACTIVITY_REVEAL_SECS > 0);

fn secs(n: i64) -> TimeDelta { TimeDelta::seconds(n) }

// ─── Stages ──────────────────────────────────────────────────────────────────

/// Visibility of a trip's tickets. Ordered from least to most revealed.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TicketStage {
  Hidden,
  /// Only the boarding QR code is shown; destination stays a secret.
  QrOnly,
  Full,
}

/// Visibility of a single schedule item.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStage {
  Hidden,
  Revealed,
}

/// Visibility of the trip destination and its weather.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DestinationStage {
  Hidden,
  /// Country, region and weather hints only.
  Approximate,
  Full,
}

impl TicketStage {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Hidden => "hidden",
      Self::QrOnly => "qr_only",
      Self::Full => "full",
    }
  }
}

impl ActivityStage {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Hidden => "hidden",
      Self::Revealed => "revealed",
    }
  }
}

impl DestinationStage {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Hidden => "hidden",
      Self::Approximate => "approximate",
      Self::Full => "full",
    }
  }
}

// ─── Kinds ───────────────────────────────────────────────────────────────────

/// Which timeline a target belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealKind {
  /// Tickets, keyed by the trip departure time.
  Departure,
  /// A schedule item, keyed by its start time.
  Activity,
  /// The destination, keyed by the trip departure time.
  Destination,
}

impl RevealKind {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Departure => "departure",
      Self::Activity => "activity",
      Self::Destination => "destination",
    }
  }
}

impl fmt::Display for RevealKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for RevealKind {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "departure" => Ok(Self::Departure),
      "activity" => Ok(Self::Activity),
      "destination" => Ok(Self::Destination),
      other => Err(Error::UnknownKind(other.to_owned())),
    }
  }
}

// ─── Predicates ──────────────────────────────────────────────────────────────

/// Ticket stage for a trip departing at `departure`.
pub fn departure_reveal_state(
  now: DateTime<Utc>,
  departure: DateTime<Utc>,
) -> TicketStage {
  let remaining = departure - now;
  if remaining <= secs(TICKET_FULL_SECS) {
    TicketStage::Full
  } else if remaining <= secs(TICKET_QR_ONLY_SECS) {
    TicketStage::QrOnly
  } else {
    TicketStage::Hidden
  }
}

/// Stage of a schedule item starting at `start`.
pub fn activity_reveal_state(
  now: DateTime<Utc>,
  start: DateTime<Utc>,
) -> ActivityStage {
  if start - now < secs(ACTIVITY_REVEAL_SECS) {
    ActivityStage::Revealed
  } else {
    ActivityStage::Hidden
  }
}

/// Destination stage for a trip departing at `departure`.
pub fn destination_reveal_state(
  now: DateTime<Utc>,
  departure: DateTime<Utc>,
) -> DestinationStage {
  let remaining = departure - now;
  if remaining <= secs(DESTINATION_FULL_SECS) {
    DestinationStage::Full
  } else if remaining <= secs(DESTINATION_APPROXIMATE_SECS) {
    DestinationStage::Approximate
  } else {
    DestinationStage::Hidden
  }
}

/// The instant at which the predicate for `kind` next changes stage, or
/// `None` once the maximal stage is reached.
pub fn next_threshold(
  kind: RevealKind,
  now: DateTime<Utc>,
  target: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
  let before = |n: i64| Some(target - secs(n));
  match kind {
    RevealKind::Departure => match departure_reveal_state(now, target) {
      TicketStage::Hidden => before(TICKET_QR_ONLY_SECS),
      TicketStage::QrOnly => before(TICKET_FULL_SECS),
      TicketStage::Full => None,
    },
    RevealKind::Activity => match activity_reveal_state(now, target) {
      ActivityStage::Hidden => before(ACTIVITY_REVEAL_SECS),
      ActivityStage::Revealed => None,
    },
    RevealKind::Destination => match destination_reveal_state(now, target) {
      DestinationStage::Hidden => before(DESTINATION_APPROXIMATE_SECS),
      DestinationStage::Approximate => before(DESTINATION_FULL_SECS),
      DestinationStage::Full => None,
    },
  }
}
