//! Error types for `techpro-core`.

use thiserror::Error;

use crate::model::RecordId;

/// Authentication and authorisation failures, shown to the user verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
  #[error("invalid credentials")]
  InvalidCredentials,

  #[error("email already registered")]
  EmailExists,

  #[error("sign in required")]
  SignInRequired,

  #[error("only an admin can do that")]
  AdminRequired,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Auth(#[from] AuthError),

  #[error("missing required field: {0}")]
  MissingField(&'static str),

  #[error("record not found: {0}")]
  NotFound(RecordId),

  #[error("no submissions to export")]
  NothingToExport,

  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
