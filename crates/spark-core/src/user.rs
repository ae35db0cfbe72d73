//! User accounts and premium grants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// System-assigned user identity.
pub type UserId = i64;

/// There is no third category in this model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
  Male,
  Female,
}

impl Gender {
  /// The gender shown in this user's candidate feed.
  pub fn opposite(self) -> Self {
    match self {
      Gender::Male => Gender::Female,
      Gender::Female => Gender::Male,
    }
  }
}

// ─── Premium ─────────────────────────────────────────────────────────────────

/// Feature flags unlocked by a premium grant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumFeatures {
  pub unlimited_swipes: bool,
  pub is_verified:      bool,
}

impl PremiumFeatures {
  pub fn is_enabled(&self, feature: PremiumFeature) -> bool {
    match feature {
      PremiumFeature::UnlimitedSwipes => self.unlimited_swipes,
      PremiumFeature::IsVerified => self.is_verified,
    }
  }

  pub fn enable(&mut self, feature: PremiumFeature) {
    match feature {
      PremiumFeature::UnlimitedSwipes => self.unlimited_swipes = true,
      PremiumFeature::IsVerified => self.is_verified = true,
    }
  }
}

/// A purchasable feature, named exactly as clients send it.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
pub enum PremiumFeature {
  UnlimitedSwipes,
  IsVerified,
}

impl PremiumFeature {
  pub fn already_active_message(self) -> &'static str {
    match self {
      PremiumFeature::UnlimitedSwipes => "unlimited swipes is already active",
      PremiumFeature::IsVerified => "user is already verified",
    }
  }
}

// ─── User ────────────────────────────────────────────────────────────────────

/// A stored account. Created at signup, mutated by premium grants, never
/// deleted. Email and phone are unique across all users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub user_id:          UserId,
  pub email:            String,
  pub phone:            String,
  /// Argon2 PHC string; never serialised.
  #[serde(skip_serializing, default)]
  pub password_hash:    String,
  pub name:             String,
  pub gender:           Gender,
  pub is_inactive:      bool,
  pub premium_expiry:   Option<DateTime<Utc>>,
  pub premium_features: PremiumFeatures,
  pub created_at:       DateTime<Utc>,
  pub updated_at:       DateTime<Utc>,
}

impl User {
  /// True while a premium grant is running at `now`.
  pub fn has_premium(&self, now: DateTime<Utc>) -> bool {
    self.premium_expiry.is_some_and(|expiry| expiry > now)
  }

  /// Whether the daily swipe quota is lifted for this user at `now`.
  pub fn has_unlimited_swipes(&self, now: DateTime<Utc>) -> bool {
    self.has_premium(now) && self.premium_features.unlimited_swipes
  }

  pub fn profile(&self) -> UserProfile { UserProfile::from(self) }
}

/// Insert form of [`User`]; the store assigns `user_id`.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub email:         String,
  pub phone:         String,
  pub password_hash: String,
  pub name:          String,
  pub gender:        Gender,
  pub created_at:    DateTime<Utc>,
}

impl NewUser {
  pub fn into_user(self, user_id: UserId) -> User {
    User {
      user_id,
      email: self.email,
      phone: self.phone,
      password_hash: self.password_hash,
      name: self.name,
      gender: self.gender,
      is_inactive: false,
      premium_expiry: None,
      premium_features: PremiumFeatures::default(),
      created_at: self.created_at,
      updated_at: self.created_at,
    }
  }
}

/// The public view of a user, as shown in another user's candidate feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
  pub user_id:          UserId,
  pub email:            String,
  pub phone:            String,
  pub name:             String,
  pub gender:           Gender,
  pub is_inactive:      bool,
  pub premium_expiry:   Option<DateTime<Utc>>,
  pub premium_features: PremiumFeatures,
  pub created_at:       DateTime<Utc>,
  pub updated_at:       DateTime<Utc>,
}

impl From<&User> for UserProfile {
  fn from(u: &User) -> Self {
    UserProfile {
      user_id:          u.user_id,
      email:            u.email.clone(),
      phone:            u.phone.clone(),
      name:             u.name.clone(),
      gender:           u.gender,
      is_inactive:      u.is_inactive,
      premium_expiry:   u.premium_expiry,
      premium_features: u.premium_features,
      created_at:       u.created_at,
      updated_at:       u.updated_at,
    }
  }
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use chrono::{Duration, TimeZone, Utc};

  use super::*;

  fn user() -> User {
    NewUser {
      email:         "a@example.com".into(),
      phone:         "555".into(),
      password_hash: "$argon2id$secret".into(),
      name:          "A".into(),
      gender:        Gender::Male,
      created_at:    Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
    }
    .into_user(1)
  }

  #[test]
  fn opposite_gender() {
    assert_eq!(Gender::Male.opposite(), Gender::Female);
    assert_eq!(Gender::Female.opposite(), Gender::Male);
  }

  #[test]
  fn feature_names_parse_exactly() {
    assert_eq!(
      PremiumFeature::from_str("UnlimitedSwipes").unwrap(),
      PremiumFeature::UnlimitedSwipes
    );
    assert_eq!(PremiumFeature::from_str("IsVerified").unwrap(), PremiumFeature::IsVerified);
    assert!(PremiumFeature::from_str("unlimitedswipes").is_err());
    assert!(PremiumFeature::from_str("ProfileBoost").is_err());
  }

  #[test]
  fn premium_requires_future_expiry() {
    let now = Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap();
    let mut u = user();
    u.premium_features.unlimited_swipes = true;
    assert!(!u.has_unlimited_swipes(now));

    u.premium_expiry = Some(now);
    assert!(!u.has_premium(now), "expiry equal to now is not active");

    u.premium_expiry = Some(now + Duration::seconds(1));
    assert!(u.has_unlimited_swipes(now));

    u.premium_features.unlimited_swipes = false;
    assert!(!u.has_unlimited_swipes(now));
  }

  #[test]
  fn password_hash_is_not_serialised() {
    let json = serde_json::to_string(&user()).unwrap();
    assert!(!json.contains("argon2"), "{json}");
    assert!(json.contains("\"gender\":\"male\""), "{json}");
  }
}
