//! [`SqliteStore`]: the SQLite implementation of [`UserStore`] and
//! [`SwipeStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use spark_core::{
  store::{SwipeStore, UserStore},
  swipe::SwipeEvent,
  user::{NewUser, User, UserId},
};

use crate::{
  Error, Result,
  encode::{RawSwipe, RawUser, USER_COLUMNS, encode_action, encode_dt},
  schema::SCHEMA,
};

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn constraint_violation(e: &rusqlite::Error) -> Option<String> {
  match e {
    rusqlite::Error::SqliteFailure(f, msg)
      if f.code == rusqlite::ErrorCode::ConstraintViolation =>
    {
      Some(msg.clone().unwrap_or_else(|| "constraint violation".to_owned()))
    }
    _ => None,
  }
}

fn user_params(raw: &RawUser) -> [&dyn rusqlite::ToSql; 11] {
  [
    &raw.email,
    &raw.phone,
    &raw.password_hash,
    &raw.name,
    &raw.gender,
    &raw.is_inactive,
    &raw.premium_expiry,
    &raw.unlimited_swipes,
    &raw.is_verified,
    &raw.created_at,
    &raw.updated_at,
  ]
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Spark store backed by a single SQLite file.
///
/// Cloning shares the underlying connection.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open a throwaway in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch a single user matching `column = value`.
  async fn find_user_by(&self, column: &'static str, value: String) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = ?1"),
            rusqlite::params![value],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }
}

// ─── UserStore impl ──────────────────────────────────────────────────────────

impl UserStore for SqliteStore {
  type Error = Error;

  async fn get_user(&self, id: UserId) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
            rusqlite::params![id],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
    self.find_user_by("email", email.to_owned()).await
  }

  async fn get_user_by_phone(&self, phone: &str) -> Result<Option<User>> {
    self.find_user_by("phone", phone.to_owned()).await
  }

  async fn list_users(&self) -> Result<Vec<User>> {
    let raws: Vec<RawUser> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY user_id"))?;
        let rows = stmt
          .query_map([], RawUser::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_user).collect()
  }

  async fn add_user(&self, input: NewUser) -> Result<User> {
    let mut user = input.into_user(0);
    let raw = RawUser::from_user(&user);

    let outcome: Result<_> = self
      .conn
      .call(move |conn| {
        let inserted = conn.execute(
          "INSERT INTO users (
             email, phone, password_hash, name, gender, is_inactive,
             premium_expiry, unlimited_swipes, is_verified, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
          &user_params(&raw)[..],
        );
        match inserted {
          Ok(_) => Ok(Ok(conn.last_insert_rowid())),
          Err(e) => match constraint_violation(&e) {
            Some(msg) => Ok(Err(Error::Conflict(msg))),
            None => Err(e.into()),
          },
        }
      })
      .await?;

    user.user_id = outcome?;
    tracing::debug!(user_id = user.user_id, "user inserted");
    Ok(user)
  }

  async fn insert_user(&self, user: User) -> Result<()> {
    let raw = RawUser::from_user(&user);

    let outcome: Result<_> = self
      .conn
      .call(move |conn| {
        let exists = conn
          .query_row("SELECT 1 FROM users WHERE user_id = ?1", [raw.user_id], |_| Ok(()))
          .optional()?
          .is_some();
        if exists {
          return Ok(Err(Error::DuplicateUserId(raw.user_id)));
        }

        let mut params: Vec<&dyn rusqlite::ToSql> = vec![&raw.user_id];
        params.extend(user_params(&raw));
        let inserted = conn.execute(
          "INSERT INTO users (
             user_id, email, phone, password_hash, name, gender, is_inactive,
             premium_expiry, unlimited_swipes, is_verified, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
          &params[..],
        );
        match inserted {
          Ok(_) => Ok(Ok(())),
          Err(e) => match constraint_violation(&e) {
            Some(msg) => Ok(Err(Error::Conflict(msg))),
            None => Err(e.into()),
          },
        }
      })
      .await?;

    outcome
  }

  async fn update_user(&self, user: User) -> Result<()> {
    let raw = RawUser::from_user(&user);

    let outcome: Result<_> = self
      .conn
      .call(move |conn| {
        let mut params: Vec<&dyn rusqlite::ToSql> = user_params(&raw).to_vec();
        params.push(&raw.user_id);
        let updated = conn.execute(
          "UPDATE users SET
             email = ?1, phone = ?2, password_hash = ?3, name = ?4, gender = ?5,
             is_inactive = ?6, premium_expiry = ?7, unlimited_swipes = ?8,
             is_verified = ?9, created_at = ?10, updated_at = ?11
           WHERE user_id = ?12",
          &params[..],
        );
        match updated {
          Ok(0) => Ok(Err(Error::UserNotFound(raw.user_id))),
          Ok(_) => Ok(Ok(())),
          Err(e) => match constraint_violation(&e) {
            Some(msg) => Ok(Err(Error::Conflict(msg))),
            None => Err(e.into()),
          },
        }
      })
      .await?;

    outcome
  }
}

// ─── SwipeStore impl ─────────────────────────────────────────────────────────

impl SwipeStore for SqliteStore {
  type Error = Error;

  async fn swipes_for_actor(&self, actor: UserId) -> Result<Vec<SwipeEvent>> {
    let raws: Vec<RawSwipe> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT actor_id, target_id, action, created_at
           FROM swipes
           WHERE actor_id = ?1
           ORDER BY swipe_id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![actor], |row| {
            Ok(RawSwipe {
              actor_id:   row.get(0)?,
              target_id:  row.get(1)?,
              action:     row.get(2)?,
              created_at: row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSwipe::into_event).collect()
  }

  async fn append_swipe(&self, event: SwipeEvent) -> Result<()> {
    let action = encode_action(event.action);
    let at_str = encode_dt(event.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO swipes (actor_id, target_id, action, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![event.actor_id, event.target_id, action, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
