//! The `UserStore` and `SwipeStore` traits.
//!
//! Implemented by storage backends (e.g. `spark-store-sqlite`, or the
//! in-process [`MemoryStore`](crate::memory::MemoryStore)). The swipe engine
//! and account service depend on these abstractions, never on a backend.

use std::future::Future;

use crate::{
  swipe::SwipeEvent,
  user::{NewUser, User, UserId},
};

// ─── Users ───────────────────────────────────────────────────────────────────

/// Key-value persistence for user accounts.
///
/// Lookups return `Ok(None)` for an absent record; `Err` is reserved for the
/// backend itself failing.
pub trait UserStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Retrieve a user by id.
  fn get_user(
    &self,
    id: UserId,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Exact-match lookup by email.
  fn get_user_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// Exact-match lookup by phone number.
  fn get_user_by_phone<'a>(
    &'a self,
    phone: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// Every user, in ascending id (= insertion) order.
  fn list_users(&self) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  /// Persist a new user, assigning the next id.
  ///
  /// Returns an error if the email or phone is already taken.
  fn add_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Persist a user with a caller-supplied id.
  ///
  /// Returns an error if the id, email or phone is already taken.
  fn insert_user(&self, user: User) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Replace an existing user record in full.
  ///
  /// Returns an error if no user with `user.user_id` exists.
  fn update_user(&self, user: User) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── Swipes ──────────────────────────────────────────────────────────────────

/// Append-only log of swipe events, keyed by actor.
pub trait SwipeStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// All events recorded by `actor`, in no particular order.
  fn swipes_for_actor(
    &self,
    actor: UserId,
  ) -> impl Future<Output = Result<Vec<SwipeEvent>, Self::Error>> + Send + '_;

  /// Append an event. There is no update or delete.
  fn append_swipe(
    &self,
    event: SwipeEvent,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
