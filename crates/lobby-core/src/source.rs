//! The `TripSource` trait.
//!
//! Trips and schedule items are owned by an external data layer. The API
//! depends on this read-only abstraction, not on any concrete backend, and
//! never writes through it.

use std::future::Future;

use uuid::Uuid;

use crate::trip::{ScheduleItem, TripRecord};

/// Read access to trip records.
///
/// All methods return `Send` futures so the trait can be used from axum
/// handlers on a multi-threaded runtime.
pub trait TripSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// All trips, in the source's natural order.
  fn list_trips(
    &self,
  ) -> impl Future<Output = Result<Vec<TripRecord>, Self::Error>> + Send + '_;

  /// A single trip. Returns `None` if not found.
  fn get_trip(
    &self,
    trip_id: Uuid,
  ) -> impl Future<Output = Result<Option<TripRecord>, Self::Error>> + Send + '_;

  /// Schedule items for a trip, ordered by start time as stored.
  fn schedule(
    &self,
    trip_id: Uuid,
  ) -> impl Future<Output = Result<Vec<ScheduleItem>, Self::Error>> + Send + '_;
}
