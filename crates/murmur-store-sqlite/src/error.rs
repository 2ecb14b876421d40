//! Error type for `murmur-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] murmur_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A UNIQUE constraint on `users.username` or `users.email` fired.
  #[error("username or email already in use")]
  DuplicateUser,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
