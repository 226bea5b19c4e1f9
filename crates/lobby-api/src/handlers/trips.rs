//! Handler for `GET /trips`.

use axum::{Json, extract::State};
use lobby_core::source::TripSource;
use serde::Serialize;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Listing entry. The departure time itself is never secret; only what it
/// gates is.
#[derive(Debug, Serialize)]
pub struct TripSummary {
  pub trip_id:        Uuid,
  pub name:           String,
  pub departure_time: Option<String>,
}

/// `GET /trips`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<TripSummary>>, ApiError>
where
  S: TripSource + 'static,
{
  let trips = state
    .source
    .list_trips()
    .await
    .map_err(|e| ApiError::Source(Box::new(e)))?;

  Ok(Json(
    trips
      .into_iter()
      .map(|t| TripSummary {
        trip_id:        t.trip_id,
        name:           t.name,
        departure_time: t.departure_time,
      })
      .collect(),
  ))
}
