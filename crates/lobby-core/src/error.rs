//! Error types for `lobby-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid {field} timestamp {value:?}: {source}")]
  InvalidTimestamp {
    field:  &'static str,
    value:  String,
    #[source]
    source: chrono::ParseError,
  },

  #[error("unknown role: {0:?}")]
  UnknownRole(String),

  #[error("unknown reveal kind: {0:?}")]
  UnknownKind(String),

  #[error("stage {stage:?} does not belong to a {kind} reveal")]
  UnknownStage { kind: &'static str, stage: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
