//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with fixed sub-second precision
//! so that lexical order matches chronological order.

use chrono::{DateTime, SecondsFormat, Utc};
use spark_core::{
  swipe::{SwipeAction, SwipeEvent},
  user::{Gender, PremiumFeatures, User, UserId},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339_opts(SecondsFormat::Nanos, true) }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Gender ──────────────────────────────────────────────────────────────────

pub fn encode_gender(g: Gender) -> &'static str {
  match g {
    Gender::Male => "male",
    Gender::Female => "female",
  }
}

pub fn decode_gender(s: &str) -> Result<Gender> {
  match s {
    "male" => Ok(Gender::Male),
    "female" => Ok(Gender::Female),
    other => Err(Error::UnknownEnum { column: "gender", value: other.to_owned() }),
  }
}

// ─── SwipeAction ─────────────────────────────────────────────────────────────

pub fn encode_action(a: SwipeAction) -> &'static str {
  match a {
    SwipeAction::Like => "like",
    SwipeAction::Pass => "pass",
  }
}

pub fn decode_action(s: &str) -> Result<SwipeAction> {
  match s {
    "like" => Ok(SwipeAction::Like),
    "pass" => Ok(SwipeAction::Pass),
    other => Err(Error::UnknownEnum { column: "action", value: other.to_owned() }),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching the field order of [`RawUser::from_row`].
pub const USER_COLUMNS: &str = "user_id, email, phone, password_hash, name, gender, is_inactive,
   premium_expiry, unlimited_swipes, is_verified, created_at, updated_at";

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub user_id:          UserId,
  pub email:            String,
  pub phone:            String,
  pub password_hash:    String,
  pub name:             String,
  pub gender:           String,
  pub is_inactive:      bool,
  pub premium_expiry:   Option<String>,
  pub unlimited_swipes: bool,
  pub is_verified:      bool,
  pub created_at:       String,
  pub updated_at:       String,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawUser {
      user_id:          row.get(0)?,
      email:            row.get(1)?,
      phone:            row.get(2)?,
      password_hash:    row.get(3)?,
      name:             row.get(4)?,
      gender:           row.get(5)?,
      is_inactive:      row.get(6)?,
      premium_expiry:   row.get(7)?,
      unlimited_swipes: row.get(8)?,
      is_verified:      row.get(9)?,
      created_at:       row.get(10)?,
      updated_at:       row.get(11)?,
    })
  }

  pub fn from_user(u: &User) -> Self {
    RawUser {
      user_id:          u.user_id,
      email:            u.email.clone(),
      phone:            u.phone.clone(),
      password_hash:    u.password_hash.clone(),
      name:             u.name.clone(),
      gender:           encode_gender(u.gender).to_owned(),
      is_inactive:      u.is_inactive,
      premium_expiry:   u.premium_expiry.map(encode_dt),
      unlimited_swipes: u.premium_features.unlimited_swipes,
      is_verified:      u.premium_features.is_verified,
      created_at:       encode_dt(u.created_at),
      updated_at:       encode_dt(u.updated_at),
    }
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:          self.user_id,
      email:            self.email,
      phone:            self.phone,
      password_hash:    self.password_hash,
      name:             self.name,
      gender:           decode_gender(&self.gender)?,
      is_inactive:      self.is_inactive,
      premium_expiry:   self.premium_expiry.as_deref().map(decode_dt).transpose()?,
      premium_features: PremiumFeatures {
        unlimited_swipes: self.unlimited_swipes,
        is_verified:      self.is_verified,
      },
      created_at:       decode_dt(&self.created_at)?,
      updated_at:       decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read directly from a `swipes` row.
pub struct RawSwipe {
  pub actor_id:   UserId,
  pub target_id:  UserId,
  pub action:     String,
  pub created_at: String,
}

impl RawSwipe {
  pub fn into_event(self) -> Result<SwipeEvent> {
    Ok(SwipeEvent {
      actor_id:   self.actor_id,
      target_id:  self.target_id,
      action:     decode_action(&self.action)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn timestamps_sort_lexically() {
    let a = Utc.with_ymd_and_hms(2024, 5, 10, 0, 0, 0).unwrap();
    let b = a + chrono::Duration::milliseconds(1);
    assert!(encode_dt(a) < encode_dt(b));
    assert_eq!(decode_dt(&encode_dt(b)).unwrap(), b);
  }

  #[test]
  fn unknown_gender_is_an_error() {
    assert!(matches!(
      decode_gender("other"),
      Err(Error::UnknownEnum { column: "gender", .. })
    ));
  }
}
