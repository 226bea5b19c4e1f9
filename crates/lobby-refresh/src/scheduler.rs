//! Per-target refresh tasks and their owning handles.
//!
//! Each watch runs one tokio task:
//!
//! ```text
//! tick | refresh() | retarget() ──► resolve(now, target) ──► publish if changed
//! ```
//!
//! The tick path only reads the clock and the locally held target; it never
//! waits on I/O. A [`Watch`] owns its task and aborts it on drop, so a torn
//! down view cannot leave a timer behind.

use std::{fmt::Debug, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use lobby_core::{
  clock::Clock,
  policy::{self, RevealState, Role, ThresholdCountdown},
  reveal::RevealKind,
};
use tokio::{
  sync::{Notify, watch},
  task::JoinHandle,
  time::MissedTickBehavior,
};

use crate::{RefreshConfig, Result};

// ─── Published values ────────────────────────────────────────────────────────

/// Reveal state together with the countdown to its next transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
  pub state: RevealState,
  pub next:  Option<ThresholdCountdown>,
}

/// Values a watch can publish. `state` is what transition logging keys on.
pub trait Observed: Clone + PartialEq + Debug + Send + Sync + 'static {
  fn state(&self) -> RevealState;
}

impl Observed for RevealState {
  fn state(&self) -> RevealState { *self }
}

impl Observed for Snapshot {
  fn state(&self) -> RevealState { self.state }
}

// ─── Handle ──────────────────────────────────────────────────────────────────

/// Owned handle to one refresh task.
pub struct Watch<T> {
  values:  watch::Receiver<T>,
  target:  watch::Sender<Option<DateTime<Utc>>>,
  refresh: Arc<Notify>,
  task:    JoinHandle<()>,
}

/// Publishes only when the reveal state changes.
pub type RevealWatch = Watch<RevealState>;

/// Publishes on every countdown tick.
pub type CountdownWatch = Watch<Snapshot>;

impl<T: Clone> Watch<T> {
  /// The most recently published value.
  pub fn current(&self) -> T { self.values.borrow().clone() }

  /// Wait for the next published value. Returns `None` once the task is gone.
  pub async fn changed(&mut self) -> Option<T> {
    self.values.changed().await.ok()?;
    Some(self.values.borrow_and_update().clone())
  }

  /// An additional observer of the same values.
  pub fn subscribe(&self) -> watch::Receiver<T> { self.values.clone() }

  /// Replace the target timestamp, e.g. after an admin edited the departure
  /// time. Re-evaluates immediately.
  pub fn retarget(&self, target: Option<DateTime<Utc>>) {
    self.target.send_replace(target);
  }

  /// Re-evaluate now instead of waiting for the next tick.
  pub fn refresh(&self) { self.refresh.notify_one(); }

  /// Stop the refresh task. Equivalent to dropping the handle.
  pub fn cancel(self) {}
}

impl<T> Drop for Watch<T> {
  fn drop(&mut self) {
    self.task.abort();
    tracing::trace!("refresh watch cancelled");
  }
}

// ─── Scheduler ───────────────────────────────────────────────────────────────

/// Spawns refresh watches that share one clock and cadence.
///
/// Watches are independent: each has its own timer and may be cancelled on
/// its own. Must be used from within a tokio runtime.
#[derive(Clone)]
pub struct RefreshScheduler {
  clock:  Arc<dyn Clock>,
  config: RefreshConfig,
}

impl RefreshScheduler {
  pub fn new(clock: Arc<dyn Clock>, config: RefreshConfig) -> Result<Self> {
    config.validate()?;
    Ok(Self { clock, config })
  }

  pub fn config(&self) -> &RefreshConfig { &self.config }

  /// Watch the reveal state of one target on the reveal cadence.
  pub fn watch_reveal(
    &self,
    kind: RevealKind,
    role: Role,
    target: Option<DateTime<Utc>>,
  ) -> RevealWatch {
    self.spawn(target, self.config.reveal_interval(), move |now, target| {
      policy::resolve(kind, now, target, role)
    })
  }

  /// Watch the reveal state and the countdown to its next transition on the
  /// countdown cadence.
  pub fn watch_countdown(
    &self,
    kind: RevealKind,
    role: Role,
    target: Option<DateTime<Utc>>,
  ) -> CountdownWatch {
    self.spawn(target, self.config.countdown_interval(), move |now, target| {
      Snapshot {
        state: policy::resolve(kind, now, target, role),
        next:  policy::next_transition(kind, now, target, role)
          .map(|at| ThresholdCountdown::new(kind, now, at)),
      }
    })
  }

  fn spawn<T, F>(
    &self,
    target: Option<DateTime<Utc>>,
    every: Duration,
    compute: F,
  ) -> Watch<T>
  where
    T: Observed,
    F: Fn(DateTime<Utc>, Option<DateTime<Utc>>) -> T + Send + 'static,
  {
    let clock = Arc::clone(&self.clock);
    let (value_tx, values) = watch::channel(compute(clock.now(), target));
    let (target_tx, mut target_rx) = watch::channel(target);
    let refresh = Arc::new(Notify::new());
    let notified = Arc::clone(&refresh);

    let task = tokio::spawn(async move {
      let mut ticker = tokio::time::interval(every);
      ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
      // The first tick is immediate and the initial value is already out.
      ticker.tick().await;

      loop {
        tokio::select! {
          _ = ticker.tick() => {}
          _ = notified.notified() => {}
          changed = target_rx.changed() => {
            if changed.is_err() {
              break;
            }
          }
        }

        let target = *target_rx.borrow_and_update();
        let next = compute(clock.now(), target);
        value_tx.send_if_modified(|current| {
          if *current == next {
            return false;
          }
          if current.state() != next.state() {
            tracing::debug!(
              from = %current.state(),
              to = %next.state(),
              kind = %next.state().kind(),
              "reveal state changed"
            );
          }
          *current = next;
          true
        });
      }
    });

    Watch { values, target: target_tx, refresh, task }
  }
}
