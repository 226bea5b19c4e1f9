//! Core types and reveal logic for the Lobby trip coordinator.
//!
//! Everything here is a pure function of timestamps, a viewer role and an
//! injected [`clock::Clock`]. This crate is deliberately free of HTTP and
//! async-runtime dependencies; the refresh scheduler, the API and the CLI all
//! depend on it.

pub mod clock;
pub mod countdown;
pub mod error;
pub mod policy;
pub mod reveal;
pub mod source;
pub mod trip;
pub mod view;

pub use error::{Error, Result};
