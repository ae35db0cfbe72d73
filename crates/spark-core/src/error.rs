//! Error types for `spark-core`.
//!
//! Every variant except [`Error::Store`] is a terminal business-rule failure
//! whose `Display` text is safe to show to the end user verbatim.

use thiserror::Error;

use crate::user::{PremiumFeature, UserId};

#[derive(Debug, Error)]
pub enum Error {
  #[error("user not found")]
  UserNotFound(UserId),

  #[error("you have already swiped on this profile today")]
  DuplicateSwipe { actor: UserId, target: UserId },

  #[error("daily swipe limit reached")]
  QuotaExceeded(UserId),

  #[error("user account is inactive")]
  InactiveAccount(UserId),

  #[error("{}", .0.already_active_message())]
  AlreadyActive(PremiumFeature),

  #[error("invalid premium feature: {0}")]
  InvalidFeature(String),

  #[error("invalid duration")]
  InvalidDuration(i64),

  #[error("email already exists")]
  EmailTaken,

  #[error("phone number already exists")]
  PhoneTaken,

  #[error("invalid input: {0}")]
  InvalidInput(String),

  #[error("identifier is required")]
  MissingIdentifier,

  #[error("invalid email/phone or password")]
  InvalidCredentials,

  #[error("failed to save password")]
  PasswordHash(String),

  #[error("failed to generate token")]
  TokenIssue(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// The backing store failed. Distinct from an absent record, which surfaces
  /// as [`Error::UserNotFound`].
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
