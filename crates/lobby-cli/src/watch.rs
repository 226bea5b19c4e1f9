//! `lobby watch`: live countdown driven by the refresh scheduler.
//!
//! The ticket countdown ticks every second; destination and activity reveals
//! are re-evaluated on the slower reveal cadence. Every watch is owned by
//! [`run`] and cancelled when it returns.

use anyhow::Result;
use lobby_core::{policy::RevealState, reveal::RevealKind};
use lobby_refresh::{RefreshScheduler, RevealWatch};
use tokio::{sync::mpsc, task::JoinSet};

use crate::{render, timeline::TimelineArgs};

pub async fn run(scheduler: RefreshScheduler, args: TimelineArgs) -> Result<()> {
  let mut ticket =
    scheduler.watch_countdown(RevealKind::Departure, args.role, args.departure);
  let mut destination =
    scheduler.watch_reveal(RevealKind::Destination, args.role, args.departure);
  let activities: Vec<RevealWatch> = args
    .activities
    .iter()
    .map(|start| scheduler.watch_reveal(RevealKind::Activity, args.role, Some(*start)))
    .collect();

  let snapshot = ticket.current();
  let mut ticket_stage = snapshot.state;
  println!("{}", render::line("ticket", snapshot.state, snapshot.next.as_ref()));
  println!("{}", render::line("destination", destination.current(), None));
  for (i, watch) in activities.iter().enumerate() {
    println!("{}", render::line(&format!("activity {}", i + 1), watch.current(), None));
  }

  // Fan activity changes into one channel. Forwarders end on their own when
  // the watches are dropped.
  let (tx, mut activity_changes) = mpsc::unbounded_channel::<(usize, RevealState)>();
  let mut forwarders = JoinSet::new();
  for (i, watch) in activities.iter().enumerate() {
    let mut observer = watch.subscribe();
    let tx = tx.clone();
    forwarders.spawn(async move {
      while observer.changed().await.is_ok() {
        let state = *observer.borrow_and_update();
        if tx.send((i, state)).is_err() {
          break;
        }
      }
    });
  }
  drop(tx);

  let shutdown = tokio::signal::ctrl_c();
  tokio::pin!(shutdown);

  loop {
    tokio::select! {
      result = &mut shutdown => {
        result?;
        break;
      }
      Some(snapshot) = ticket.changed() => {
        if snapshot.state != ticket_stage {
          tracing::info!(state = %snapshot.state, "ticket reveal changed");
          ticket_stage = snapshot.state;
        }
        println!("{}", render::line("ticket", snapshot.state, snapshot.next.as_ref()));
      }
      Some(state) = destination.changed() => {
        tracing::info!(%state, "destination reveal changed");
        println!("{}", render::line("destination", state, None));
      }
      Some((i, state)) = activity_changes.recv() => {
        tracing::info!(activity = i + 1, %state, "activity reveal changed");
        println!("{}", render::line(&format!("activity {}", i + 1), state, None));
      }
    }
  }

  tracing::debug!(watches = activities.len() + 2, "stopping refresh watches");
  Ok(())
}
