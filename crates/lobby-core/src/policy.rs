//! The reveal policy: the one place that turns a target timestamp and a
//! viewer role into a [`RevealState`].
//!
//! Rules, in order:
//! 1. A missing or unparseable target is [`RevealState::Unknown`] for every
//!    role. Admin bypass does not paper over missing data.
//! 2. Admins see the maximal stage of every kind immediately.
//! 3. Everyone else gets whatever the predicate in [`crate::reveal`] says.

use std::{fmt, str::FromStr, sync::Arc};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error,
  clock::{Clock, SystemClock},
  countdown::Countdown,
  reveal::{
    self, ActivityStage, DestinationStage, RevealKind, TicketStage,
  },
  trip::{ScheduleItem, TripRecord},
};

// ─── Viewer ──────────────────────────────────────────────────────────────────

/// The viewer's role within a trip, as reported by the identity provider.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
  Admin,
  #[default]
  Member,
}

impl Role {
  pub fn is_admin(self) -> bool { matches!(self, Self::Admin) }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Admin => "admin",
      Self::Member => "member",
    })
  }
}

impl FromStr for Role {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "admin" => Ok(Self::Admin),
      "member" => Ok(Self::Member),
      _ => Err(Error::UnknownRole(s.to_owned())),
    }
  }
}

// ─── Reveal state ────────────────────────────────────────────────────────────

/// The resolved visibility of one target. Never stored; always recomputed.
///
/// On the wire this is `{"kind": "departure", "stage": "qr_only"}`, with
/// `"stage": "unknown"` when the target time is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "WireState", try_from = "WireState")]
pub enum RevealState {
  Unknown(RevealKind),
  Departure(TicketStage),
  Activity(ActivityStage),
  Destination(DestinationStage),
}

impl RevealState {
  /// The most revealed state for `kind`.
  pub fn maximal(kind: RevealKind) -> Self {
    match kind {
      RevealKind::Departure => Self::Departure(TicketStage::Full),
      RevealKind::Activity => Self::Activity(ActivityStage::Revealed),
      RevealKind::Destination => Self::Destination(DestinationStage::Full),
    }
  }

  pub fn kind(self) -> RevealKind {
    match self {
      Self::Unknown(kind) => kind,
      Self::Departure(_) => RevealKind::Departure,
      Self::Activity(_) => RevealKind::Activity,
      Self::Destination(_) => RevealKind::Destination,
    }
  }

  pub fn stage_str(self) -> &'static str {
    match self {
      Self::Unknown(_) => "unknown",
      Self::Departure(s) => s.as_str(),
      Self::Activity(s) => s.as_str(),
      Self::Destination(s) => s.as_str(),
    }
  }

  pub fn is_unknown(self) -> bool { matches!(self, Self::Unknown(_)) }

  pub fn is_maximal(self) -> bool { self == Self::maximal(self.kind()) }

  /// Position along the kind's timeline, starting at 0 for `hidden`.
  /// `None` for [`RevealState::Unknown`].
  pub fn rank(self) -> Option<u8> {
    match self {
      Self::Unknown(_) => None,
      Self::Departure(s) => Some(s as u8),
      Self::Activity(s) => Some(s as u8),
      Self::Destination(s) => Some(s as u8),
    }
  }
}

impl fmt::Display for RevealState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.stage_str())
  }
}

#[derive(Serialize, Deserialize)]
struct WireState {
  kind:  RevealKind,
  stage: String,
}

impl From<RevealState> for WireState {
  fn from(state: RevealState) -> Self {
    Self { kind: state.kind(), stage: state.stage_str().to_owned() }
  }
}

impl TryFrom<WireState> for RevealState {
  type Error = Error;

  fn try_from(wire: WireState) -> Result<Self, Self::Error> {
    let stage = wire.stage.as_str();
    let state = match (wire.kind, stage) {
      (kind, "unknown") => Some(Self::Unknown(kind)),
      (RevealKind::Departure, "hidden") => Some(Self::Departure(TicketStage::Hidden)),
      (RevealKind::Departure, "qr_only") => Some(Self::Departure(TicketStage::QrOnly)),
      (RevealKind::Departure, "full") => Some(Self::Departure(TicketStage::Full)),
      (RevealKind::Activity, "hidden") => Some(Self::Activity(ActivityStage::Hidden)),
      (RevealKind::Activity, "revealed") => Some(Self::Activity(ActivityStage::Revealed)),
      (RevealKind::Destination, "hidden") => {
        Some(Self::Destination(DestinationStage::Hidden))
      }
      (RevealKind::Destination, "approximate") => {
        Some(Self::Destination(DestinationStage::Approximate))
      }
      (RevealKind::Destination, "full") => Some(Self::Destination(DestinationStage::Full)),
      _ => None,
    };
    state.ok_or_else(|| Error::UnknownStage {
      kind:  wire.kind.as_str(),
      stage: wire.stage.clone(),
    })
  }
}

// ─── Resolution ──────────────────────────────────────────────────────────────

/// Resolve the visibility of a target of `kind` for `role` at `now`.
pub fn resolve(
  kind: RevealKind,
  now: DateTime<Utc>,
  target: Option<DateTime<Utc>>,
  role: Role,
) -> RevealState {
  let Some(target) = target else {
    return RevealState::Unknown(kind);
  };
  if role.is_admin() {
    return RevealState::maximal(kind);
  }
  match kind {
    RevealKind::Departure => {
      RevealState::Departure(reveal::departure_reveal_state(now, target))
    }
    RevealKind::Activity => {
      RevealState::Activity(reveal::activity_reveal_state(now, target))
    }
    RevealKind::Destination => {
      RevealState::Destination(reveal::destination_reveal_state(now, target))
    }
  }
}

/// When `role` will next see `kind` change, or `None` if it never will
/// (already maximal, admin, or no target).
pub fn next_transition(
  kind: RevealKind,
  now: DateTime<Utc>,
  target: Option<DateTime<Utc>>,
  role: Role,
) -> Option<DateTime<Utc>> {
  if role.is_admin() {
    return None;
  }
  reveal::next_threshold(kind, now, target?)
}

// ─── Report ──────────────────────────────────────────────────────────────────

/// An upcoming transition and the time left until it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdCountdown {
  pub kind:      RevealKind,
  pub at:        DateTime<Utc>,
  pub countdown: Countdown,
}

impl ThresholdCountdown {
  pub fn new(kind: RevealKind, now: DateTime<Utc>, at: DateTime<Utc>) -> Self {
    Self { kind, at, countdown: Countdown::until(now, at) }
  }
}

/// Resolved visibility of a single schedule item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityReveal {
  pub item_id: Uuid,
  pub state:   RevealState,
  pub next:    Option<ThresholdCountdown>,
}

/// Everything a viewer may know about a trip's reveal timeline at `as_of`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealReport {
  pub trip_id:          Uuid,
  pub role:             Role,
  pub as_of:            DateTime<Utc>,
  pub ticket:           RevealState,
  pub ticket_next:      Option<ThresholdCountdown>,
  pub destination:      RevealState,
  pub destination_next: Option<ThresholdCountdown>,
  pub activities:       Vec<ActivityReveal>,
  /// The soonest upcoming transition across all of the above.
  pub next_threshold:   Option<ThresholdCountdown>,
}

// ─── Policy ──────────────────────────────────────────────────────────────────

/// Reveal policy bound to a clock.
///
/// Cheap to clone; every surface that shows gated data goes through one of
/// these rather than branching on stages itself.
#[derive(Clone)]
pub struct RevealPolicy {
  clock: Arc<dyn Clock>,
}

impl RevealPolicy {
  pub fn new(clock: Arc<dyn Clock>) -> Self { Self { clock } }

  /// Policy on the system wall clock.
  pub fn system() -> Self { Self::new(Arc::new(SystemClock)) }

  pub fn now(&self) -> DateTime<Utc> { self.clock.now() }

  pub fn clock(&self) -> Arc<dyn Clock> { Arc::clone(&self.clock) }

  pub fn resolve(
    &self,
    kind: RevealKind,
    target: Option<DateTime<Utc>>,
    role: Role,
  ) -> RevealState {
    resolve(kind, self.now(), target, role)
  }

  /// Ticket visibility for `trip`.
  pub fn departure(&self, trip: &TripRecord, role: Role) -> RevealState {
    resolve(RevealKind::Departure, self.now(), departure_target(trip), role)
  }

  pub fn destination(&self, trip: &TripRecord, role: Role) -> RevealState {
    resolve(RevealKind::Destination, self.now(), departure_target(trip), role)
  }

  pub fn activity(&self, item: &ScheduleItem, role: Role) -> RevealState {
    resolve(RevealKind::Activity, self.now(), item.start_at().ok(), role)
  }

  /// Resolve every target of `trip` against a single reading of the clock.
  pub fn report(
    &self,
    trip: &TripRecord,
    items: &[ScheduleItem],
    role: Role,
  ) -> RevealReport {
    let now = self.now();
    let departure = departure_target(trip);
    let upcoming = |kind, target| {
      next_transition(kind, now, target, role)
        .map(|at| ThresholdCountdown::new(kind, now, at))
    };

    let activities: Vec<ActivityReveal> = items
      .iter()
      .map(|item| {
        let start = item.start_at().ok();
        ActivityReveal {
          item_id: item.item_id,
          state:   resolve(RevealKind::Activity, now, start, role),
          next:    upcoming(RevealKind::Activity, start),
        }
      })
      .collect();

    let ticket_next = upcoming(RevealKind::Departure, departure);
    let destination_next = upcoming(RevealKind::Destination, departure);
    let next_threshold = [ticket_next, destination_next]
      .into_iter()
      .flatten()
      .chain(activities.iter().filter_map(|a| a.next))
      .min_by_key(|t| t.at);

    RevealReport {
      trip_id: trip.trip_id,
      role,
      as_of: now,
      ticket: resolve(RevealKind::Departure, now, departure, role),
      ticket_next,
      destination: resolve(RevealKind::Destination, now, departure, role),
      destination_next,
      activities,
      next_threshold,
    }
  }
}

fn departure_target(trip: &TripRecord) -> Option<DateTime<Utc>> {
  trip.departure_at().ok().flatten()
}
