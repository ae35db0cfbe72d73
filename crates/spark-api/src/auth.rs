//! Bearer-token extractor.

use axum::{
  extract::FromRequestParts,
  http::{header, request::Parts},
};
use spark_core::user::UserId;
use tracing::warn;

use crate::{AppState, error::ApiError};

/// The authenticated caller. Present in a handler means the request carried a
/// valid, unexpired token.
pub struct AuthUser(pub UserId);

impl<S> FromRequestParts<AppState<S>> for AuthUser
where
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let header_val = parts
      .headers
      .get(header::AUTHORIZATION)
      .and_then(|v| v.to_str().ok())
      .ok_or(ApiError::Unauthorized("missing authorization header"))?;

    let token = header_val
      .strip_prefix("Bearer ")
      .ok_or(ApiError::Unauthorized("invalid authorization header"))?;

    let claims = state.keys.verify(token).map_err(|e| {
      warn!(error = %e, "rejected bearer token");
      ApiError::Unauthorized("invalid or expired token")
    })?;

    Ok(AuthUser(claims.sub))
  }
}
