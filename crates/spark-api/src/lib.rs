//! JSON HTTP API for Spark.
//!
//! Exposes an axum [`Router`] backed by any store implementing both
//! [`UserStore`] and [`SwipeStore`]. Successful responses are wrapped as
//! `{"data": ...}` and failures as `{"error": "..."}`.
//!
//! | Method | Path                | Auth   |
//! |--------|---------------------|--------|
//! | `GET`  | `/health`           | none   |
//! | `POST` | `/signup`           | none   |
//! | `POST` | `/login`            | none   |
//! | `POST` | `/purchase-premium` | bearer |
//! | `POST` | `/swipe`            | bearer |
//! | `GET`  | `/candidates`       | bearer |

pub mod accounts;
pub mod auth;
pub mod envelope;
pub mod error;
pub mod jwt;
pub mod premium;
pub mod swipes;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use serde::Deserialize;
use spark_core::{
  account::AccountService,
  engine::SwipeEngine,
  store::{SwipeStore, UserStore},
};
use tower_http::trace::TraceLayer;

use jwt::JwtKeys;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `SPARK_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:          String,
  pub port:          u16,
  /// SQLite file, or `:memory:` for a throwaway database.
  pub store_path:    PathBuf,
  pub jwt_secret:    String,
  #[serde(default = "default_jwt_ttl_hours")]
  pub jwt_ttl_hours: i64,
}

fn default_jwt_ttl_hours() -> i64 { 24 }

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub engine:   Arc<SwipeEngine<S, S>>,
  pub accounts: Arc<AccountService<S, JwtKeys>>,
  pub keys:     Arc<JwtKeys>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      engine:   self.engine.clone(),
      accounts: self.accounts.clone(),
      keys:     self.keys.clone(),
    }
  }
}

impl<S> AppState<S>
where
  S: UserStore + SwipeStore,
{
  /// Wire the swipe engine and account service over a single store.
  pub fn new(store: Arc<S>, keys: Arc<JwtKeys>) -> Self {
    Self {
      engine: Arc::new(SwipeEngine::new(store.clone(), store.clone())),
      accounts: Arc::new(AccountService::new(store, keys.clone())),
      keys,
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the Spark API [`Router`].
pub fn router<S>(state: AppState<S>) -> Router
where
  S: UserStore + SwipeStore + 'static,
{
  Router::new()
    .route("/health", get(health))
    .route("/signup", post(accounts::sign_up::<S>))
    .route("/login", post(accounts::login::<S>))
    .route("/purchase-premium", post(premium::purchase::<S>))
    .route("/swipe", post(swipes::record::<S>))
    .route("/candidates", get(swipes::candidates::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

async fn health() -> &'static str { "ok" }
