//! The swipe engine: daily quota, same-day de-duplication, premium override
//! and candidate filtering.
//!
//! All day boundaries are UTC midnight as computed by [`day_start`]. Recording
//! counts events created *at or after* midnight, while candidate filtering
//! hides targets swiped *strictly after* midnight, so a swipe stamped exactly
//! at midnight counts toward the quota but does not hide its target.

use std::{
  collections::{HashMap, HashSet},
  sync::{Arc, Weak},
};

use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::{
  Error, Result,
  clock::{Clock, SystemClock, day_start},
  store::{SwipeStore, UserStore},
  swipe::{SwipeAction, SwipeEvent},
  user::{User, UserId, UserProfile},
};

/// Swipes allowed per actor per UTC day without an unlimited-swipes grant.
pub const DAILY_SWIPE_LIMIT: usize = 10;

pub struct SwipeEngine<U, W, C = SystemClock> {
  users:  Arc<U>,
  swipes: Arc<W>,
  clock:  C,
  /// One async mutex per actor, held across check-then-append. Entries die
  /// with the last in-flight swipe and are pruned on the next insert.
  locks:  Mutex<HashMap<UserId, Weak<Mutex<()>>>>,
}

impl<U, W> SwipeEngine<U, W>
where
  U: UserStore,
  W: SwipeStore,
{
  pub fn new(users: Arc<U>, swipes: Arc<W>) -> Self {
    Self::with_clock(users, swipes, SystemClock)
  }
}

impl<U, W, C> SwipeEngine<U, W, C>
where
  U: UserStore,
  W: SwipeStore,
  C: Clock,
{
  pub fn with_clock(users: Arc<U>, swipes: Arc<W>, clock: C) -> Self {
    Self { users, swipes, clock, locks: Mutex::new(HashMap::new()) }
  }

  async fn actor_lock(&self, actor: UserId) -> Arc<Mutex<()>> {
    let mut locks = self.locks.lock().await;
    if let Some(lock) = locks.get(&actor).and_then(Weak::upgrade) {
      return lock;
    }
    locks.retain(|_, lock| lock.strong_count() > 0);
    let lock = Arc::new(Mutex::new(()));
    locks.insert(actor, Arc::downgrade(&lock));
    lock
  }

  async fn load_user(&self, id: UserId) -> Result<User> {
    self
      .users
      .get_user(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::UserNotFound(id))
  }

  /// Record a swipe by `actor` on `target`.
  ///
  /// Checks run in this order: same-day duplicate, actor lookup, quota. The
  /// event is appended only after every check passes, with a server-assigned
  /// timestamp.
  #[instrument(skip(self))]
  pub async fn record_swipe(
    &self,
    actor: UserId,
    target: UserId,
    action: SwipeAction,
  ) -> Result<SwipeEvent> {
    let lock = self.actor_lock(actor).await;
    let _guard = lock.lock().await;

    let now = self.clock.now();
    let today = day_start(now);

    let history = self.swipes.swipes_for_actor(actor).await.map_err(Error::store)?;
    let todays: Vec<&SwipeEvent> = history.iter().filter(|s| s.created_at >= today).collect();

    if todays.iter().any(|s| s.target_id == target) {
      warn!(actor, target, "duplicate swipe rejected");
      return Err(Error::DuplicateSwipe { actor, target });
    }

    let user = self.load_user(actor).await?;

    let counted = if user.has_unlimited_swipes(now) { 0 } else { todays.len() };
    if counted >= DAILY_SWIPE_LIMIT {
      warn!(actor, swipes_today = todays.len(), "daily swipe limit reached");
      return Err(Error::QuotaExceeded(actor));
    }

    let event = SwipeEvent { actor_id: actor, target_id: target, action, created_at: now };
    self.swipes.append_swipe(event.clone()).await.map_err(Error::store)?;

    info!(actor, target, ?action, swipes_today = todays.len() + 1, "swipe recorded");
    Ok(event)
  }

  /// Profiles `actor` may swipe on next, in store enumeration order.
  ///
  /// Excludes the actor, same-gender users, inactive users and anyone the
  /// actor swiped on strictly after the start of the current UTC day.
  #[instrument(skip(self))]
  pub async fn candidates(&self, actor: UserId) -> Result<Vec<UserProfile>> {
    let user = self.load_user(actor).await?;
    let today = day_start(self.clock.now());

    let swiped: HashSet<UserId> = self
      .swipes
      .swipes_for_actor(actor)
      .await
      .map_err(Error::store)?
      .into_iter()
      .filter(|s| s.created_at > today)
      .map(|s| s.target_id)
      .collect();

    let wanted = user.gender.opposite();
    let candidates: Vec<UserProfile> = self
      .users
      .list_users()
      .await
      .map_err(Error::store)?
      .iter()
      .filter(|u| {
        u.user_id != actor && u.gender == wanted && !swiped.contains(&u.user_id) && !u.is_inactive
      })
      .map(UserProfile::from)
      .collect();

    debug!(actor, count = candidates.len(), "candidates computed");
    Ok(candidates)
  }
}
