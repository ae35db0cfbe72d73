//! Handlers for `/signup` and `/login`.
//!
//! | Method | Path      | Notes |
//! |--------|-----------|-------|
//! | `POST` | `/signup` | Body: `{"email","password","phone","name","gender"}`; 201 |
//! | `POST` | `/login`  | Body: `{"identifier","password"}`; identifier is an email or phone |

use axum::{Json, extract::State, extract::rejection::JsonRejection, response::IntoResponse};
use serde::Serialize;
use spark_core::{
  account::{Credentials, SignUp},
  store::{SwipeStore, UserStore},
};

use crate::{
  AppState,
  envelope::{Data, Message},
  error::ApiError,
};

// ─── Sign up ──────────────────────────────────────────────────────────────────

/// `POST /signup`
pub async fn sign_up<S>(
  State(state): State<AppState<S>>,
  payload: Result<Json<SignUp>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: UserStore + SwipeStore,
{
  let Json(input) = payload?;
  state.accounts.sign_up(input).await?;
  Ok(Data::created(Message::new("user has been added")))
}

// ─── Log in ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct LoginResponse {
  pub message: &'static str,
  pub token:   String,
}

/// `POST /login`
pub async fn login<S>(
  State(state): State<AppState<S>>,
  payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: UserStore + SwipeStore,
{
  let Json(creds) = payload?;
  let token = state.accounts.login(creds).await?;
  Ok(Data::ok(LoginResponse { message: "login success", token }))
}
