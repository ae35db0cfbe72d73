//! `POST /purchase-premium`, body: `{"duration": <days>, "features": [..]}`.
//!
//! Feature names are `UnlimitedSwipes` and `IsVerified`. The grant applies to
//! the authenticated caller.

use axum::{Json, extract::State, extract::rejection::JsonRejection, response::IntoResponse};
use serde::Deserialize;
use spark_core::store::{SwipeStore, UserStore};

use crate::{
  AppState,
  auth::AuthUser,
  envelope::{Data, Message},
  error::ApiError,
};

#[derive(Debug, Deserialize)]
pub struct PurchaseBody {
  /// Days to add to the premium grant.
  pub duration: i64,
  #[serde(default)]
  pub features: Vec<String>,
}

pub async fn purchase<S>(
  State(state): State<AppState<S>>,
  AuthUser(user_id): AuthUser,
  payload: Result<Json<PurchaseBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: UserStore + SwipeStore,
{
  let Json(body) = payload?;
  state.accounts.enable_features(user_id, body.duration, &body.features).await?;
  Ok(Data::ok(Message::new("Premium features enabled successfully")))
}
