//! HTTP handlers, one module per resource.

pub mod reveal;
pub mod trips;
pub mod views;

use lobby_core::{source::TripSource, trip::TripRecord};
use uuid::Uuid;

use crate::error::ApiError;

/// Fetch a trip or fail with 404.
///
/// A departure time that does not parse is logged here; the policy then
/// reports it as `unknown`.
pub(crate) async fn load_trip<S>(source: &S, trip_id: Uuid) -> Result<TripRecord, ApiError>
where
  S: TripSource,
{
  let trip = source
    .get_trip(trip_id)
    .await
    .map_err(|e| ApiError::Source(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("trip {trip_id} not found")))?;

  if let Err(e) = trip.departure_at() {
    tracing::warn!(%trip_id, error = %e, "departure time unparseable");
  }
  Ok(trip)
}
