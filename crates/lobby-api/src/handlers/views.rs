//! Handlers returning redacted views of gated records.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/trips/{id}/tickets` | One [`TicketView`] per ticket |
//! | `GET`  | `/trips/{id}/destination` | [`DestinationView`] |
//! | `GET`  | `/trips/{id}/schedule` | One [`ScheduleItemView`] per item |
//!
//! All accept `?role=admin|member` (default `member`).

use axum::{
  Json,
  extract::{Path, Query, State},
};
use lobby_core::{
  source::TripSource,
  view::{DestinationView, ScheduleItemView, TicketView},
};
use uuid::Uuid;

use super::load_trip;
use crate::{AppState, ViewerParams, error::ApiError};

// ─── Tickets ──────────────────────────────────────────────────────────────────

/// `GET /trips/{id}/tickets`
pub async fn tickets<S>(
  State(state): State<AppState<S>>,
  Path(trip_id): Path<Uuid>,
  Query(viewer): Query<ViewerParams>,
) -> Result<Json<Vec<TicketView>>, ApiError>
where
  S: TripSource + 'static,
{
  let trip = load_trip(&*state.source, trip_id).await?;
  let stage = state.policy.departure(&trip, viewer.role);
  Ok(Json(
    trip
      .tickets
      .iter()
      .map(|t| TicketView::redact(t, stage))
      .collect(),
  ))
}

// ─── Destination ──────────────────────────────────────────────────────────────

/// `GET /trips/{id}/destination`
pub async fn destination<S>(
  State(state): State<AppState<S>>,
  Path(trip_id): Path<Uuid>,
  Query(viewer): Query<ViewerParams>,
) -> Result<Json<DestinationView>, ApiError>
where
  S: TripSource + 'static,
{
  let trip = load_trip(&*state.source, trip_id).await?;
  let stage = state.policy.destination(&trip, viewer.role);
  Ok(Json(DestinationView::redact(trip.destination.as_ref(), stage)))
}

// ─── Schedule ─────────────────────────────────────────────────────────────────

/// `GET /trips/{id}/schedule`
pub async fn schedule<S>(
  State(state): State<AppState<S>>,
  Path(trip_id): Path<Uuid>,
  Query(viewer): Query<ViewerParams>,
) -> Result<Json<Vec<ScheduleItemView>>, ApiError>
where
  S: TripSource + 'static,
{
  // 404 for unknown trips rather than an empty schedule.
  load_trip(&*state.source, trip_id).await?;
  let items = state
    .source
    .schedule(trip_id)
    .await
    .map_err(|e| ApiError::Source(Box::new(e)))?;

  Ok(Json(
    items
      .iter()
      .map(|item| {
        if let Err(e) = item.start_at() {
          tracing::warn!(item_id = %item.item_id, error = %e, "start time unparseable");
        }
        ScheduleItemView::redact(item, state.policy.activity(item, viewer.role))
      })
      .collect(),
  ))
}
