//! Live refresh scheduler for reveal state.
//!
//! Reveal state is never pushed by a backend; it is a pure function of time.
//! This crate re-evaluates it on a fixed cadence (and on demand) for each
//! target a consumer is displaying, and publishes changes over a
//! [`tokio::sync::watch`] channel. Every watch is an owned handle: dropping it
//! stops its timer.

mod config;
mod scheduler;

pub mod error;

pub use config::RefreshConfig;
pub use error::{Error, Result};
pub use scheduler::{
  CountdownWatch, RefreshScheduler, RevealWatch, Snapshot, Watch,
};

#[cfg(test)]
mod tests;
