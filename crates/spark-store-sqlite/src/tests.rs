//! Integration tests for `SqliteStore` against an in-memory database.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use spark_core::{
  clock::{FixedClock, day_start},
  engine::{DAILY_SWIPE_LIMIT, SwipeEngine},
  store::{SwipeStore, UserStore},
  swipe::{SwipeAction, SwipeEvent},
  user::{Gender, NewUser, PremiumFeatures, UserId},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn now() -> DateTime<Utc> { Utc.with_ymd_and_hms(2024, 5, 10, 15, 0, 0).unwrap() }

fn new_user(tag: &str, gender: Gender) -> NewUser {
  NewUser {
    email: format!("{tag}@example.com"),
    phone: format!("555-{tag}"),
    password_hash: "$argon2id$v=19$stub".into(),
    name: tag.to_uppercase(),
    gender,
    created_at: now() - Duration::days(3),
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_user() {
  let s = store().await;

  let alice = s.add_user(new_user("alice", Gender::Female)).await.unwrap();
  assert!(alice.user_id > 0);
  assert!(!alice.is_inactive);
  assert_eq!(alice.premium_expiry, None);

  let fetched = s.get_user(alice.user_id).await.unwrap().unwrap();
  assert_eq!(fetched, alice);
  assert_eq!(fetched.password_hash, "$argon2id$v=19$stub");
}

#[tokio::test]
async fn get_user_missing_returns_none() {
  let s = store().await;
  assert!(s.get_user(42).await.unwrap().is_none());
  assert!(s.get_user_by_email("nobody@example.com").await.unwrap().is_none());
  assert!(s.get_user_by_phone("000").await.unwrap().is_none());
}

#[tokio::test]
async fn lookup_by_email_and_phone() {
  let s = store().await;
  let bob = s.add_user(new_user("bob", Gender::Male)).await.unwrap();

  let by_email = s.get_user_by_email("bob@example.com").await.unwrap().unwrap();
  assert_eq!(by_email.user_id, bob.user_id);

  let by_phone = s.get_user_by_phone("555-bob").await.unwrap().unwrap();
  assert_eq!(by_phone.user_id, bob.user_id);
}

#[tokio::test]
async fn list_users_in_id_order() {
  let s = store().await;
  let a = s.add_user(new_user("a", Gender::Male)).await.unwrap();
  let b = s.add_user(new_user("b", Gender::Female)).await.unwrap();
  let c = s.add_user(new_user("c", Gender::Male)).await.unwrap();

  let ids: Vec<UserId> = s.list_users().await.unwrap().iter().map(|u| u.user_id).collect();
  assert_eq!(ids, vec![a.user_id, b.user_id, c.user_id]);
}

#[tokio::test]
async fn duplicate_email_or_phone_conflicts() {
  let s = store().await;
  s.add_user(new_user("carol", Gender::Female)).await.unwrap();

  let mut same_email = new_user("dave", Gender::Male);
  same_email.email = "carol@example.com".into();
  assert!(matches!(s.add_user(same_email).await, Err(Error::Conflict(_))));

  let mut same_phone = new_user("erin", Gender::Female);
  same_phone.phone = "555-carol".into();
  assert!(matches!(s.add_user(same_phone).await, Err(Error::Conflict(_))));

  assert_eq!(s.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn insert_user_keeps_id_and_rejects_duplicates() {
  let s = store().await;
  let user = new_user("frank", Gender::Male).into_user(7);
  s.insert_user(user.clone()).await.unwrap();
  assert_eq!(s.get_user(7).await.unwrap(), Some(user));

  let mut again = new_user("grace", Gender::Female).into_user(7);
  again.email = "grace@example.com".into();
  assert!(matches!(s.insert_user(again).await, Err(Error::DuplicateUserId(7))));

  let next = s.add_user(new_user("heidi", Gender::Female)).await.unwrap();
  assert!(next.user_id > 7, "auto ids continue after explicit ones");
}

#[tokio::test]
async fn update_user_persists_premium_fields() {
  let s = store().await;
  let mut user = s.add_user(new_user("ivan", Gender::Male)).await.unwrap();

  user.premium_expiry = Some(now() + Duration::days(30));
  user.premium_features = PremiumFeatures { unlimited_swipes: true, is_verified: false };
  user.is_inactive = true;
  user.updated_at = now();
  s.update_user(user.clone()).await.unwrap();

  let fetched = s.get_user(user.user_id).await.unwrap().unwrap();
  assert_eq!(fetched, user);
}

#[tokio::test]
async fn update_missing_user_is_an_error() {
  let s = store().await;
  let ghost = new_user("ghost", Gender::Male).into_user(99);
  assert!(matches!(s.update_user(ghost).await, Err(Error::UserNotFound(99))));
}

// ─── Swipes ──────────────────────────────────────────────────────────────────

fn swipe(actor: UserId, target: UserId, at: DateTime<Utc>) -> SwipeEvent {
  SwipeEvent { actor_id: actor, target_id: target, action: SwipeAction::Like, created_at: at }
}

#[tokio::test]
async fn swipes_are_scoped_to_actor_and_ordered() {
  let s = store().await;
  s.append_swipe(swipe(1, 2, now())).await.unwrap();
  s.append_swipe(swipe(3, 1, now())).await.unwrap();
  s.append_swipe(SwipeEvent { action: SwipeAction::Pass, ..swipe(1, 4, now()) }).await.unwrap();

  let mine = s.swipes_for_actor(1).await.unwrap();
  assert_eq!(mine.len(), 2);
  assert_eq!(mine[0].target_id, 2);
  assert_eq!(mine[1].target_id, 4);
  assert_eq!(mine[1].action, SwipeAction::Pass);

  assert!(s.swipes_for_actor(5).await.unwrap().is_empty());
}

#[tokio::test]
async fn swipe_timestamps_round_trip_exactly() {
  let s = store().await;
  let at = day_start(now()) + Duration::nanoseconds(1);
  s.append_swipe(swipe(1, 2, at)).await.unwrap();

  let stored = s.swipes_for_actor(1).await.unwrap();
  assert_eq!(stored[0].created_at, at);
}

// ─── Engine over SQLite ──────────────────────────────────────────────────────

#[tokio::test]
async fn engine_enforces_quota_over_sqlite() {
  let s = Arc::new(store().await);
  let actor = s.add_user(new_user("judy", Gender::Female)).await.unwrap();
  let engine = SwipeEngine::with_clock(s.clone(), s.clone(), FixedClock(now()));

  for target in 0..DAILY_SWIPE_LIMIT as UserId {
    engine.record_swipe(actor.user_id, 1000 + target, SwipeAction::Like).await.unwrap();
  }

  let err = engine.record_swipe(actor.user_id, 2000, SwipeAction::Pass).await.unwrap_err();
  assert!(matches!(err, spark_core::Error::QuotaExceeded(_)), "{err:?}");
  assert_eq!(s.swipes_for_actor(actor.user_id).await.unwrap().len(), DAILY_SWIPE_LIMIT);
}

#[tokio::test]
async fn engine_candidates_over_sqlite() {
  let s = Arc::new(store().await);
  let me = s.add_user(new_user("kate", Gender::Female)).await.unwrap();
  let liked = s.add_user(new_user("leo", Gender::Male)).await.unwrap();
  let open = s.add_user(new_user("mike", Gender::Male)).await.unwrap();
  s.add_user(new_user("nina", Gender::Female)).await.unwrap();

  let engine = SwipeEngine::with_clock(s.clone(), s.clone(), FixedClock(now()));
  engine.record_swipe(me.user_id, liked.user_id, SwipeAction::Like).await.unwrap();

  let ids: Vec<UserId> =
    engine.candidates(me.user_id).await.unwrap().iter().map(|p| p.user_id).collect();
  assert_eq!(ids, vec![open.user_id]);
}
