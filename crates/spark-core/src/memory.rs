//! [`MemoryStore`], a process-local implementation of both store traits.
//!
//! Cloning is cheap; clones share the same underlying maps.

use std::{collections::BTreeMap, sync::Arc};

use thiserror::Error;
use tokio::sync::RwLock;

use crate::{
  store::{SwipeStore, UserStore},
  swipe::SwipeEvent,
  user::{NewUser, User, UserId},
};

#[derive(Debug, Error)]
pub enum MemoryStoreError {
  #[error("user id {0} already exists")]
  DuplicateUserId(UserId),

  #[error("user not found: {0}")]
  UserNotFound(UserId),

  #[error("email already registered: {0}")]
  DuplicateEmail(String),

  #[error("phone already registered: {0}")]
  DuplicatePhone(String),
}

#[derive(Default)]
struct Inner {
  users:  BTreeMap<UserId, User>,
  swipes: Vec<SwipeEvent>,
}

impl Inner {
  /// Uniqueness check for email and phone, ignoring the user `except`.
  fn check_unique(&self, user: &User, except: Option<UserId>) -> Result<(), MemoryStoreError> {
    for other in self.users.values() {
      if Some(other.user_id) == except {
        continue;
      }
      if other.email == user.email {
        return Err(MemoryStoreError::DuplicateEmail(user.email.clone()));
      }
      if other.phone == user.phone {
        return Err(MemoryStoreError::DuplicatePhone(user.phone.clone()));
      }
    }
    Ok(())
  }

  fn next_id(&self) -> UserId {
    self.users.keys().next_back().map_or(1, |id| id + 1)
  }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
  inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }
}

impl UserStore for MemoryStore {
  type Error = MemoryStoreError;

  async fn get_user(&self, id: UserId) -> Result<Option<User>, Self::Error> {
    Ok(self.inner.read().await.users.get(&id).cloned())
  }

  async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, Self::Error> {
    let inner = self.inner.read().await;
    Ok(inner.users.values().find(|u| u.email == email).cloned())
  }

  async fn get_user_by_phone(&self, phone: &str) -> Result<Option<User>, Self::Error> {
    let inner = self.inner.read().await;
    Ok(inner.users.values().find(|u| u.phone == phone).cloned())
  }

  async fn list_users(&self) -> Result<Vec<User>, Self::Error> {
    Ok(self.inner.read().await.users.values().cloned().collect())
  }

  async fn add_user(&self, input: NewUser) -> Result<User, Self::Error> {
    let mut inner = self.inner.write().await;
    let user = input.into_user(inner.next_id());
    inner.check_unique(&user, None)?;
    inner.users.insert(user.user_id, user.clone());
    Ok(user)
  }

  async fn insert_user(&self, user: User) -> Result<(), Self::Error> {
    let mut inner = self.inner.write().await;
    if inner.users.contains_key(&user.user_id) {
      return Err(MemoryStoreError::DuplicateUserId(user.user_id));
    }
    inner.check_unique(&user, None)?;
    inner.users.insert(user.user_id, user);
    Ok(())
  }

  async fn update_user(&self, user: User) -> Result<(), Self::Error> {
    let mut inner = self.inner.write().await;
    if !inner.users.contains_key(&user.user_id) {
      return Err(MemoryStoreError::UserNotFound(user.user_id));
    }
    inner.check_unique(&user, Some(user.user_id))?;
    inner.users.insert(user.user_id, user);
    Ok(())
  }
}

impl SwipeStore for MemoryStore {
  type Error = MemoryStoreError;

  async fn swipes_for_actor(&self, actor: UserId) -> Result<Vec<SwipeEvent>, Self::Error> {
    let inner = self.inner.read().await;
    Ok(inner.swipes.iter().filter(|s| s.actor_id == actor).cloned().collect())
  }

  async fn append_swipe(&self, event: SwipeEvent) -> Result<(), Self::Error> {
    self.inner.write().await.swipes.push(event);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;
  use crate::{swipe::SwipeAction, user::Gender};

  fn new_user(email: &str, phone: &str) -> NewUser {
    NewUser {
      email:         email.into(),
      phone:         phone.into(),
      password_hash: String::new(),
      name:          "n".into(),
      gender:        Gender::Female,
      created_at:    Utc::now(),
    }
  }

  #[tokio::test]
  async fn add_user_assigns_increasing_ids() {
    let s = MemoryStore::new();
    let a = s.add_user(new_user("a@x.io", "1")).await.unwrap();
    let b = s.add_user(new_user("b@x.io", "2")).await.unwrap();
    assert_eq!((a.user_id, b.user_id), (1, 2));

    let ids: Vec<_> = s.list_users().await.unwrap().iter().map(|u| u.user_id).collect();
    assert_eq!(ids, vec![1, 2]);
  }

  #[tokio::test]
  async fn email_and_phone_are_unique() {
    let s = MemoryStore::new();
    s.add_user(new_user("a@x.io", "1")).await.unwrap();
    assert!(matches!(
      s.add_user(new_user("a@x.io", "2")).await,
      Err(MemoryStoreError::DuplicateEmail(_))
    ));
    assert!(matches!(
      s.add_user(new_user("b@x.io", "1")).await,
      Err(MemoryStoreError::DuplicatePhone(_))
    ));
  }

  #[tokio::test]
  async fn insert_rejects_taken_id_and_update_rejects_missing() {
    let s = MemoryStore::new();
    let u = s.add_user(new_user("a@x.io", "1")).await.unwrap();

    let mut clash = new_user("b@x.io", "2").into_user(u.user_id);
    assert!(matches!(
      s.insert_user(clash.clone()).await,
      Err(MemoryStoreError::DuplicateUserId(1))
    ));

    clash.user_id = 42;
    assert!(matches!(
      s.update_user(clash).await,
      Err(MemoryStoreError::UserNotFound(42))
    ));
  }

  #[tokio::test]
  async fn swipes_are_partitioned_by_actor() {
    let s = MemoryStore::new();
    for (actor, target) in [(1, 2), (1, 3), (2, 1)] {
      s.append_swipe(SwipeEvent {
        actor_id:   actor,
        target_id:  target,
        action:     SwipeAction::Like,
        created_at: Utc::now(),
      })
      .await
      .unwrap();
    }
    assert_eq!(s.swipes_for_actor(1).await.unwrap().len(), 2);
    assert_eq!(s.swipes_for_actor(2).await.unwrap().len(), 1);
    assert!(s.swipes_for_actor(3).await.unwrap().is_empty());
  }
}
