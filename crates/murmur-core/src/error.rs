//! Error types for `murmur-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("username must not be empty")]
  EmptyUsername,

  #[error("invalid email address: {0:?}")]
  InvalidEmail(String),

  #[error("thought text must be between 1 and 280 characters")]
  ThoughtTextLength,

  #[error("reaction body must be between 1 and 280 characters")]
  ReactionBodyLength,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
