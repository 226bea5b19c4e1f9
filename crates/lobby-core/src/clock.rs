//! Clock sources.
//!
//! Reveal decisions never read the wall clock directly; they take a
//! [`Clock`] so tests and the refresh scheduler can substitute their own time.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, TimeDelta, Utc};

/// Supplies the current instant.
pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime<Utc>;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
  fn now(&self) -> DateTime<Utc> { (**self).now() }
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> { Utc::now() }
}

/// A clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
  fn now(&self) -> DateTime<Utc> { self.0 }
}

/// A clock that only moves when told to.
///
/// Shared behind an `Arc` it lets a test drive time for every task holding
/// the same clock.
#[derive(Debug)]
pub struct ManualClock {
  now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
  pub fn new(start: DateTime<Utc>) -> Self {
    Self { now: Mutex::new(start) }
  }

  /// Jump to `instant`. Moving backwards is allowed.
  pub fn set(&self, instant: DateTime<Utc>) {
    *self.now.lock().unwrap_or_else(PoisonError::into_inner) = instant;
  }

  /// Move forward by `delta` and return the new instant.
  pub fn advance(&self, delta: TimeDelta) -> DateTime<Utc> {
    let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
    *now += delta;
    *now
  }
}

impl Clock for ManualClock {
  fn now(&self) -> DateTime<Utc> {
    *self.now.lock().unwrap_or_else(PoisonError::into_inner)
  }
}
