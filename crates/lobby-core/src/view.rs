//! Redacted read models.
//!
//! A view carries only the fields the viewer's [`RevealState`] permits; it is
//! derived on every read and never stored. Anything the stage does not cover,
//! including [`RevealState::Unknown`], yields the most redacted form.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  policy::RevealState,
  reveal::{ActivityStage, DestinationStage, TicketStage},
  trip::{Destination, ScheduleItem, Ticket},
};

// ─── Tickets ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketView {
  pub ticket_id:   Uuid,
  pub state:       RevealState,
  pub holder:      Option<String>,
  pub qr_payload:  Option<String>,
  pub carrier:     Option<String>,
  pub origin:      Option<String>,
  pub destination: Option<String>,
  pub seat:        Option<String>,
  pub reference:   Option<String>,
}

impl TicketView {
  pub fn redact(ticket: &Ticket, state: RevealState) -> Self {
    let mut view = Self {
      ticket_id:   ticket.ticket_id,
      state,
      holder:      None,
      qr_payload:  None,
      carrier:     None,
      origin:      None,
      destination: None,
      seat:        None,
      reference:   None,
    };
    match state {
      RevealState::Departure(TicketStage::Full) => {
        view.holder = Some(ticket.holder.clone());
        view.qr_payload = Some(ticket.qr_payload.clone());
        view.carrier = ticket.carrier.clone();
        view.origin = ticket.origin.clone();
        view.destination = ticket.destination.clone();
        view.seat = ticket.seat.clone();
        view.reference = ticket.reference.clone();
      }
      RevealState::Departure(TicketStage::QrOnly) => {
        view.holder = Some(ticket.holder.clone());
        view.qr_payload = Some(ticket.qr_payload.clone());
      }
      _ => {}
    }
    view
  }
}

// ─── Destination ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationView {
  pub state:        RevealState,
  pub city:         Option<String>,
  pub country:      Option<String>,
  pub region_hint:  Option<String>,
  pub weather_hint: Option<String>,
}

impl DestinationView {
  /// `destination` is `None` when the trip has none configured yet.
  pub fn redact(destination: Option<&Destination>, state: RevealState) -> Self {
    let mut view = Self {
      state,
      city: None,
      country: None,
      region_hint: None,
      weather_hint: None,
    };
    let Some(d) = destination else { return view };
    match state {
      RevealState::Destination(DestinationStage::Full) => {
        view.city = Some(d.city.clone());
        view.country = Some(d.country.clone());
        view.region_hint = d.region_hint.clone();
        view.weather_hint = d.weather_hint.clone();
      }
      RevealState::Destination(DestinationStage::Approximate) => {
        view.country = Some(d.country.clone());
        view.region_hint = d.region_hint.clone();
        view.weather_hint = d.weather_hint.clone();
      }
      _ => {}
    }
    view
  }
}

// ─── Schedule ────────────────────────────────────────────────────────────────

/// A schedule item whose title and location stay secret until revealed.
/// Timing is always visible so the group can plan around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleItemView {
  pub item_id:    Uuid,
  pub state:      RevealState,
  pub start_time: String,
  pub end_time:   Option<String>,
  pub title:      Option<String>,
  pub location:   Option<String>,
}

impl ScheduleItemView {
  pub fn redact(item: &ScheduleItem, state: RevealState) -> Self {
    let revealed = state == RevealState::Activity(ActivityStage::Revealed);
    Self {
      item_id: item.item_id,
      state,
      start_time: item.start_time.clone(),
      end_time: item.end_time.clone(),
      title: revealed.then(|| item.title.clone()),
      location: if revealed { item.location.clone() } else { None },
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::reveal::RevealKind;

  fn ticket() -> Ticket {
    Ticket {
      ticket_id:   Uuid::new_v4(),
      holder:      "Sam".into(),
      qr_payload:  "QR:ABC123".into(),
      carrier:     Some("Eurostar".into()),
      origin:      Some("Amsterdam".into()),
      destination: Some("Paris".into()),
      seat:        Some("12A".into()),
      reference:   Some("XK9F2".into()),
    }
  }

  fn destination() -> Destination {
    Destination {
      city:         "Paris".into(),
      country:      "France".into(),
      region_hint:  Some("Western Europe".into()),
      weather_hint: Some("rain, 9°C".into()),
    }
  }

  #[test]
  fn hidden_ticket_exposes_nothing_but_its_id() {
    let t = ticket();
    let view = TicketView::redact(&t, RevealState::Departure(TicketStage::Hidden));
    assert_eq!(view.ticket_id, t.ticket_id);
    assert!(view.qr_payload.is_none());
    assert!(view.holder.is_none());
    assert!(view.destination.is_none());
  }

  #[test]
  fn qr_only_ticket_hides_the_destination() {
    let view = TicketView::redact(&ticket(), RevealState::Departure(TicketStage::QrOnly));
    assert_eq!(view.qr_payload.as_deref(), Some("QR:ABC123"));
    assert!(view.destination.is_none());
    assert!(view.origin.is_none());
    assert!(view.carrier.is_none());
    assert!(view.seat.is_none());
  }

  #[test]
  fn full_ticket_exposes_everything() {
    let view = TicketView::redact(&ticket(), RevealState::Departure(TicketStage::Full));
    assert_eq!(view.destination.as_deref(), Some("Paris"));
    assert_eq!(view.reference.as_deref(), Some("XK9F2"));
  }

  #[test]
  fn unknown_state_is_fully_redacted() {
    let view =
      TicketView::redact(&ticket(), RevealState::Unknown(RevealKind::Departure));
    assert!(view.qr_payload.is_none());

    let d = destination();
    let view =
      DestinationView::redact(Some(&d), RevealState::Unknown(RevealKind::Destination));
    assert!(view.country.is_none());
  }

  #[test]
  fn approximate_destination_keeps_city_secret() {
    let d = destination();
    let view = DestinationView::redact(
      Some(&d),
      RevealState::Destination(DestinationStage::Approximate),
    );
    assert!(view.city.is_none());
    assert_eq!(view.country.as_deref(), Some("France"));
    assert_eq!(view.weather_hint.as_deref(), Some("rain, 9°C"));
  }

  #[test]
  fn mismatched_kind_does_not_unlock_fields() {
    let d = destination();
    let view = DestinationView::redact(Some(&d), RevealState::Departure(TicketStage::Full));
    assert!(view.city.is_none());
  }

  #[test]
  fn schedule_item_title_waits_for_reveal() {
    let item = ScheduleItem {
      item_id:    Uuid::new_v4(),
      trip_id:    Uuid::nil(),
      title:      "Hot air balloon".into(),
      location:   Some("Field 3".into()),
      start_time: "2026-01-16T06:00:00Z".into(),
      end_time:   None,
    };
    let hidden = ScheduleItemView::redact(&item, RevealState::Activity(ActivityStage::Hidden));
    assert!(hidden.title.is_none());
    assert!(hidden.location.is_none());
    assert_eq!(hidden.start_time, item.start_time);

    let shown = ScheduleItemView::redact(&item, RevealState::Activity(ActivityStage::Revealed));
    assert_eq!(shown.title.as_deref(), Some("Hot air balloon"));
  }
}
