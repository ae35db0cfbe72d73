//! Handlers for `/swipe` and `/candidates`.
//!
//! | Method | Path          | Notes |
//! |--------|---------------|-------|
//! | `POST` | `/swipe`      | Body: `{"target_user_id": 7, "action": "like"\|"pass"}` |
//! | `GET`  | `/candidates` | Opposite-gender, active, not swiped today |
//!
//! The actor is always the token holder, and the timestamp is assigned by the
//! server.

use axum::{Json, extract::State, extract::rejection::JsonRejection, response::IntoResponse};
use serde::Deserialize;
use spark_core::{
  store::{SwipeStore, UserStore},
  swipe::SwipeAction,
  user::UserId,
};

use crate::{
  AppState,
  auth::AuthUser,
  envelope::{Data, Message},
  error::ApiError,
};

// ─── Swipe ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SwipeBody {
  pub target_user_id: UserId,
  pub action:         SwipeAction,
}

/// `POST /swipe`
pub async fn record<S>(
  State(state): State<AppState<S>>,
  AuthUser(actor): AuthUser,
  payload: Result<Json<SwipeBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: UserStore + SwipeStore,
{
  let Json(body) = payload?;
  state.engine.record_swipe(actor, body.target_user_id, body.action).await?;
  Ok(Data::ok(Message::new("Swipe recorded successfully")))
}

// ─── Candidates ───────────────────────────────────────────────────────────────

/// `GET /candidates`
pub async fn candidates<S>(
  State(state): State<AppState<S>>,
  AuthUser(actor): AuthUser,
) -> Result<impl IntoResponse, ApiError>
where
  S: UserStore + SwipeStore,
{
  let profiles = state.engine.candidates(actor).await?;
  Ok(Data::ok(profiles))
}
