//! Signup, login and premium grants.

use std::{str::FromStr, sync::{Arc, LazyLock}};

use chrono::Duration;
use regex::Regex;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::{
  Error, Result,
  clock::{Clock, SystemClock},
  password::{hash_password, verify_password},
  store::UserStore,
  user::{Gender, NewUser, PremiumFeature, User, UserId},
};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

/// Whether a login identifier should be treated as an email address rather
/// than a phone number.
pub fn is_email(identifier: &str) -> bool { EMAIL_RE.is_match(identifier) }

/// Issues bearer tokens for authenticated users.
pub trait TokenIssuer: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn issue(&self, user_id: UserId) -> Result<String, Self::Error>;
}

/// Signup request.
#[derive(Debug, Clone, Deserialize)]
pub struct SignUp {
  pub email:    String,
  pub password: String,
  pub phone:    String,
  pub name:     String,
  pub gender:   Gender,
}

/// Login request. `identifier` is either an email address or a phone number.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
  #[serde(default)]
  pub identifier: String,
  #[serde(default)]
  pub password:   String,
}

pub struct AccountService<U, T, C = SystemClock> {
  users:   Arc<U>,
  tokens:  Arc<T>,
  clock:   C,
  /// Held across the uniqueness check and the insert of a sign-up.
  signups: Mutex<()>,
}

impl<U, T> AccountService<U, T>
where
  U: UserStore,
  T: TokenIssuer,
{
  pub fn new(users: Arc<U>, tokens: Arc<T>) -> Self { Self::with_clock(users, tokens, SystemClock) }
}

impl<U, T, C> AccountService<U, T, C>
where
  U: UserStore,
  T: TokenIssuer,
  C: Clock,
{
  pub fn with_clock(users: Arc<U>, tokens: Arc<T>, clock: C) -> Self {
    Self { users, tokens, clock, signups: Mutex::new(()) }
  }

  /// Create an account. Email is normalised to trimmed lowercase.
  ///
  /// Sign-ups are serialised from the uniqueness check through the insert,
  /// so racing requests for one email or phone see `EmailTaken`/`PhoneTaken`.
  #[instrument(skip_all, fields(email = %input.email))]
  pub async fn sign_up(&self, input: SignUp) -> Result<User> {
    let email = input.email.trim().to_lowercase();
    let phone = input.phone.trim().to_owned();
    let name = input.name.trim().to_owned();

    if email.is_empty() || phone.is_empty() || name.is_empty() || input.password.is_empty() {
      return Err(Error::InvalidInput(
        "email, phone, name and password are required".to_owned(),
      ));
    }

    let password_hash = hash_password(&input.password)?;
    let _signup = self.signups.lock().await;

    if self.users.get_user_by_email(&email).await.map_err(Error::store)?.is_some() {
      warn!("email already registered");
      return Err(Error::EmailTaken);
    }
    if self.users.get_user_by_phone(&phone).await.map_err(Error::store)?.is_some() {
      warn!("phone already registered");
      return Err(Error::PhoneTaken);
    }

    let user = self
      .users
      .add_user(NewUser {
        email,
        phone,
        password_hash,
        name,
        gender: input.gender,
        created_at: self.clock.now(),
      })
      .await
      .map_err(Error::store)?;

    info!(user_id = user.user_id, "user registered");
    Ok(user)
  }

  /// Verify credentials and issue a bearer token.
  #[instrument(skip_all)]
  pub async fn login(&self, creds: Credentials) -> Result<String> {
    let identifier = creds.identifier.trim();
    if identifier.is_empty() {
      return Err(Error::MissingIdentifier);
    }

    let found = if is_email(identifier) {
      self.users.get_user_by_email(&identifier.to_lowercase()).await
    } else {
      self.users.get_user_by_phone(identifier).await
    }
    .map_err(Error::store)?;

    let Some(user) = found else {
      warn!("login for unknown identifier");
      return Err(Error::InvalidCredentials);
    };

    if !verify_password(&creds.password, &user.password_hash) {
      warn!(user_id = user.user_id, "login with wrong password");
      return Err(Error::InvalidCredentials);
    }

    let token = self
      .tokens
      .issue(user.user_id)
      .map_err(|e| Error::TokenIssue(Box::new(e)))?;

    info!(user_id = user.user_id, "user logged in");
    Ok(token)
  }

  /// Extend a premium grant by `duration_days` and switch on `features`.
  ///
  /// The expiry stacks on a still-running grant, otherwise it starts now.
  /// Features are applied in order; the first unknown or already-enabled
  /// feature aborts the call, but the extended expiry and any flags switched
  /// on before it are still persisted.
  #[instrument(skip(self))]
  pub async fn enable_features(
    &self,
    user_id: UserId,
    duration_days: i64,
    features: &[String],
  ) -> Result<User> {
    if duration_days <= 0 {
      return Err(Error::InvalidDuration(duration_days));
    }

    let mut user = self
      .users
      .get_user(user_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::UserNotFound(user_id))?;

    if user.is_inactive {
      return Err(Error::InactiveAccount(user_id));
    }

    let now = self.clock.now();
    let base = user.premium_expiry.filter(|expiry| *expiry > now).unwrap_or(now);
    let expiry = Duration::try_days(duration_days)
      .and_then(|days| base.checked_add_signed(days))
      .ok_or(Error::InvalidDuration(duration_days))?;
    user.premium_expiry = Some(expiry);

    let outcome = apply_features(&mut user, features);

    user.updated_at = now;
    self.users.update_user(user.clone()).await.map_err(Error::store)?;

    match outcome {
      Ok(()) => {
        info!(?user.premium_expiry, "premium features enabled");
        Ok(user)
      }
      Err(e) => {
        warn!(error = %e, "premium grant stopped part way");
        Err(e)
      }
    }
  }
}

fn apply_features(user: &mut User, features: &[String]) -> Result<()> {
  for name in features {
    let feature =
      PremiumFeature::from_str(name).map_err(|_| Error::InvalidFeature(name.clone()))?;
    if user.premium_features.is_enabled(feature) {
      return Err(Error::AlreadyActive(feature));
    }
    user.premium_features.enable(feature);
  }
  Ok(())
}
