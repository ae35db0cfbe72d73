//! Swipe events: the append-only record of like/pass decisions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::user::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeAction {
  Like,
  Pass,
}

/// An immutable swipe. `created_at` is always server-assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwipeEvent {
  pub actor_id:   UserId,
  pub target_id:  UserId,
  pub action:     SwipeAction,
  pub created_at: DateTime<Utc>,
}
