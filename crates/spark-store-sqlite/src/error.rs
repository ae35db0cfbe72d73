//! Error type for `spark-store-sqlite`.

use spark_core::user::UserId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown {column} value: {value:?}")]
  UnknownEnum { column: &'static str, value: String },

  #[error("user id {0} already exists")]
  DuplicateUserId(UserId),

  /// Attempted to update a user that was never stored.
  #[error("user not found: {0}")]
  UserNotFound(UserId),

  /// A UNIQUE constraint (email or phone) rejected the write.
  #[error("conflict: {0}")]
  Conflict(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
