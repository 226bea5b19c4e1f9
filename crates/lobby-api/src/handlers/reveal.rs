//! Handler for `GET /trips/{id}/reveal`.

use axum::{
  Json,
  extract::{Path, Query, State},
};
use lobby_core::{policy::RevealReport, source::TripSource};
use uuid::Uuid;

use super::load_trip;
use crate::{AppState, ViewerParams, error::ApiError};

/// `GET /trips/{id}/reveal[?role=admin|member]`
///
/// Resolved against the server clock, so a skewed client clock cannot pull a
/// reveal forward.
pub async fn report<S>(
  State(state): State<AppState<S>>,
  Path(trip_id): Path<Uuid>,
  Query(viewer): Query<ViewerParams>,
) -> Result<Json<RevealReport>, ApiError>
where
  S: TripSource + 'static,
{
  let trip = load_trip(&*state.source, trip_id).await?;
  let items = state
    .source
    .schedule(trip_id)
    .await
    .map_err(|e| ApiError::Source(Box::new(e)))?;

  let report = state.policy.report(&trip, &items, viewer.role);
  tracing::debug!(
    %trip_id,
    role = %viewer.role,
    ticket = %report.ticket,
    destination = %report.destination,
    "reveal report"
  );
  Ok(Json(report))
}
