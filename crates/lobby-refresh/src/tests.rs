//! Scheduler tests on a paused tokio clock and a manual reveal clock.
//!
//! Tokio time drives the tickers; the `ManualClock` drives what `now` the
//! reveal predicates see. Awaiting a change lets the paused runtime
//! auto-advance to the next tick.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use lobby_core::{
  clock::ManualClock,
  policy::{RevealState, Role},
  reveal::{ActivityStage, RevealKind, TicketStage},
};
use tokio::time::timeout;

use crate::{Error, RefreshConfig, RefreshScheduler};

fn departure() -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2026, 1, 15, 14, 0, 0).unwrap()
}

fn scheduler(start: DateTime<Utc>) -> (Arc<ManualClock>, RefreshScheduler) {
  let clock = Arc::new(ManualClock::new(start));
  let scheduler =
    RefreshScheduler::new(clock.clone(), RefreshConfig::default()).unwrap();
  (clock, scheduler)
}

const PATIENCE: Duration = Duration::from_secs(600);

// ─── Configuration ───────────────────────────────────────────────────────────

#[test]
fn zero_interval_is_rejected() {
  let clock = Arc::new(ManualClock::new(departure()));
  let config = RefreshConfig { reveal_interval_secs: 0, ..Default::default() };
  let err = RefreshScheduler::new(clock, config).err().unwrap();
  assert!(matches!(err, Error::ZeroInterval("reveal")));
}

#[test]
fn default_cadence_is_a_minute_and_a_second() {
  let config = RefreshConfig::default();
  assert_eq!(config.reveal_interval(), Duration::from_secs(60));
  assert_eq!(config.countdown_interval(), Duration::from_secs(1));
}

// ─── Reveal watches ──────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn initial_state_is_published_before_any_tick() {
  let (_clock, scheduler) = scheduler(departure() - TimeDelta::hours(5));
  let watch =
    scheduler.watch_reveal(RevealKind::Departure, Role::Member, Some(departure()));
  assert_eq!(watch.current(), RevealState::Departure(TicketStage::Hidden));
}

#[tokio::test(start_paused = true)]
async fn transitions_arrive_in_timeline_order() {
  let (clock, scheduler) = scheduler(departure() - TimeDelta::hours(5));
  let mut watch =
    scheduler.watch_reveal(RevealKind::Departure, Role::Member, Some(departure()));

  clock.advance(TimeDelta::minutes(150));
  let first = timeout(PATIENCE, watch.changed()).await.unwrap();
  assert_eq!(first, Some(RevealState::Departure(TicketStage::QrOnly)));

  clock.advance(TimeDelta::minutes(105));
  let second = timeout(PATIENCE, watch.changed()).await.unwrap();
  assert_eq!(second, Some(RevealState::Departure(TicketStage::Full)));
}

#[tokio::test(start_paused = true)]
async fn unchanged_state_is_not_republished() {
  let (clock, scheduler) = scheduler(departure() - TimeDelta::hours(5));
  let mut watch =
    scheduler.watch_reveal(RevealKind::Departure, Role::Member, Some(departure()));

  clock.advance(TimeDelta::minutes(10));
  // Several ticks pass while the state stays hidden.
  let waited = timeout(Duration::from_secs(300), watch.changed()).await;
  assert!(waited.is_err(), "no change expected while still hidden");
}

#[tokio::test(start_paused = true)]
async fn refresh_recomputes_without_waiting_for_a_tick() {
  let start = departure() - TimeDelta::hours(2);
  let (clock, scheduler) = scheduler(start);
  let mut watch =
    scheduler.watch_reveal(RevealKind::Activity, Role::Member, Some(departure()));
  assert_eq!(watch.current(), RevealState::Activity(ActivityStage::Hidden));

  clock.advance(TimeDelta::minutes(90));
  watch.refresh();
  let changed = timeout(Duration::from_millis(10), watch.changed()).await.unwrap();
  assert_eq!(changed, Some(RevealState::Activity(ActivityStage::Revealed)));
}

#[tokio::test(start_paused = true)]
async fn retarget_resets_the_timeline() {
  let (_clock, scheduler) = scheduler(departure() - TimeDelta::hours(5));
  let mut watch =
    scheduler.watch_reveal(RevealKind::Departure, Role::Member, Some(departure()));

  watch.retarget(Some(departure() - TimeDelta::hours(4) - TimeDelta::minutes(30)));
  let changed = timeout(Duration::from_millis(10), watch.changed()).await.unwrap();
  assert_eq!(changed, Some(RevealState::Departure(TicketStage::Full)));

  watch.retarget(None);
  let changed = timeout(Duration::from_millis(10), watch.changed()).await.unwrap();
  assert_eq!(changed, Some(RevealState::Unknown(RevealKind::Departure)));
}

#[tokio::test(start_paused = true)]
async fn admin_watch_is_maximal_from_the_start() {
  let (_clock, scheduler) = scheduler(departure() - TimeDelta::days(5));
  let watch =
    scheduler.watch_reveal(RevealKind::Departure, Role::Admin, Some(departure()));
  assert_eq!(watch.current(), RevealState::Departure(TicketStage::Full));
}

// ─── Cancellation ────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn dropping_the_handle_stops_the_task() {
  let (_clock, scheduler) = scheduler(departure() - TimeDelta::hours(5));
  let watch =
    scheduler.watch_reveal(RevealKind::Departure, Role::Member, Some(departure()));
  let mut observer = watch.subscribe();

  drop(watch);
  let closed = timeout(PATIENCE, observer.changed()).await.unwrap();
  assert!(closed.is_err(), "publisher should be gone after drop");
}

#[tokio::test(start_paused = true)]
async fn watches_cancel_independently() {
  let (clock, scheduler) = scheduler(departure() - TimeDelta::hours(5));
  let first =
    scheduler.watch_reveal(RevealKind::Departure, Role::Member, Some(departure()));
  let mut second =
    scheduler.watch_reveal(RevealKind::Departure, Role::Member, Some(departure()));
  let mut first_observer = first.subscribe();

  first.cancel();
  assert!(timeout(PATIENCE, first_observer.changed()).await.unwrap().is_err());

  clock.advance(TimeDelta::minutes(150));
  let changed = timeout(PATIENCE, second.changed()).await.unwrap();
  assert_eq!(changed, Some(RevealState::Departure(TicketStage::QrOnly)));
}

// ─── Countdown watches ───────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn countdown_ticks_toward_the_next_threshold() {
  let start = departure() - TimeDelta::hours(3) - TimeDelta::seconds(5);
  let (clock, scheduler) = scheduler(start);
  let mut watch =
    scheduler.watch_countdown(RevealKind::Departure, Role::Member, Some(departure()));

  let initial = watch.current();
  assert_eq!(initial.state, RevealState::Departure(TicketStage::Hidden));
  assert_eq!(initial.next.unwrap().countdown.to_string(), "0h 0m 5s");

  clock.advance(TimeDelta::seconds(1));
  let tick = timeout(Duration::from_secs(5), watch.changed()).await.unwrap().unwrap();
  assert_eq!(tick.next.unwrap().countdown.to_string(), "0h 0m 4s");

  clock.advance(TimeDelta::seconds(4));
  let crossed = timeout(Duration::from_secs(5), watch.changed()).await.unwrap().unwrap();
  assert_eq!(crossed.state, RevealState::Departure(TicketStage::QrOnly));
  assert_eq!(crossed.next.unwrap().countdown.to_string(), "2h 0m 0s");
}

#[tokio::test(start_paused = true)]
async fn countdown_ends_once_maximal() {
  let (_clock, scheduler) = scheduler(departure());
  let watch =
    scheduler.watch_countdown(RevealKind::Departure, Role::Member, Some(departure()));
  let snapshot = watch.current();
  assert!(snapshot.state.is_maximal());
  assert!(snapshot.next.is_none());
}
