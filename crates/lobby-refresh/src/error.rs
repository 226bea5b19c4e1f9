//! Error type for `lobby-refresh`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("{0} interval must be greater than zero")]
  ZeroInterval(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
