//! In-memory [`TripSource`] seeded from a JSON snapshot of the data layer.
//!
//! The seed file has the shape:
//!
//! ```json
//! { "trips": [ { "trip_id": "...", "name": "...", ... } ],
//!   "schedule": [ { "item_id": "...", "trip_id": "...", ... } ] }
//! ```

use std::{convert::Infallible, future::Future, sync::Arc};

use lobby_core::{
  source::TripSource,
  trip::{ScheduleItem, TripRecord},
};
use serde::Deserialize;
use uuid::Uuid;

/// Deserialised seed file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Seed {
  #[serde(default)]
  pub trips:    Vec<TripRecord>,
  #[serde(default)]
  pub schedule: Vec<ScheduleItem>,
}

/// Read-only trip source over a fixed [`Seed`].
///
/// Cheap to clone; the seed is shared.
#[derive(Debug, Clone, Default)]
pub struct MemoryTrips {
  seed: Arc<Seed>,
}

impl MemoryTrips {
  pub fn new(seed: Seed) -> Self { Self { seed: Arc::new(seed) } }

  pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
    serde_json::from_str(raw).map(Self::new)
  }

  pub fn trip_count(&self) -> usize { self.seed.trips.len() }
}

impl TripSource for MemoryTrips {
  type Error = Infallible;

  fn list_trips(
    &self,
  ) -> impl Future<Output = Result<Vec<TripRecord>, Self::Error>> + Send + '_ {
    async move { Ok(self.seed.trips.clone()) }
  }

  fn get_trip(
    &self,
    trip_id: Uuid,
  ) -> impl Future<Output = Result<Option<TripRecord>, Self::Error>> + Send + '_ {
    async move {
      Ok(self.seed.trips.iter().find(|t| t.trip_id == trip_id).cloned())
    }
  }

  fn schedule(
    &self,
    trip_id: Uuid,
  ) -> impl Future<Output = Result<Vec<ScheduleItem>, Self::Error>> + Send + '_ {
    async move {
      let mut items: Vec<ScheduleItem> = self
        .seed
        .schedule
        .iter()
        .filter(|item| item.trip_id == trip_id)
        .cloned()
        .collect();
      // Items with an unparseable start time sort first.
      items.sort_by_key(|item| item.start_at().ok());
      Ok(items)
    }
  }
}
