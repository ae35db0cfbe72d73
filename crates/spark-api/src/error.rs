//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler or extractor.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Core(#[from] spark_core::Error),

  #[error("{0}")]
  Unauthorized(&'static str),

  #[error("invalid request payload")]
  BadPayload(#[from] JsonRejection),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    use spark_core::Error as E;

    match self {
      ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
      ApiError::BadPayload(_) => StatusCode::BAD_REQUEST,
      ApiError::Core(e) => match e {
        E::InvalidInput(_)
        | E::InvalidFeature(_)
        | E::InvalidDuration(_)
        | E::MissingIdentifier => StatusCode::BAD_REQUEST,
        E::InvalidCredentials => StatusCode::UNAUTHORIZED,
        E::DuplicateSwipe { .. } | E::QuotaExceeded(_) | E::InactiveAccount(_) => {
          StatusCode::FORBIDDEN
        }
        E::UserNotFound(_) => StatusCode::NOT_FOUND,
        E::EmailTaken | E::PhoneTaken | E::AlreadyActive(_) => StatusCode::CONFLICT,
        E::PasswordHash(_) | E::TokenIssue(_) | E::Store(_) => {
          StatusCode::INTERNAL_SERVER_ERROR
        }
      },
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = ?self, "request failed");
    }
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}

#[cfg(test)]
mod tests {
  use spark_core::{Error, user::PremiumFeature};

  use super::*;

  #[test]
  fn business_errors_map_to_statuses() {
    let cases = [
      (Error::InvalidDuration(0), StatusCode::BAD_REQUEST),
      (Error::InvalidFeature("Boost".into()), StatusCode::BAD_REQUEST),
      (Error::InvalidCredentials, StatusCode::UNAUTHORIZED),
      (Error::QuotaExceeded(1), StatusCode::FORBIDDEN),
      (Error::DuplicateSwipe { actor: 1, target: 2 }, StatusCode::FORBIDDEN),
      (Error::InactiveAccount(1), StatusCode::FORBIDDEN),
      (Error::UserNotFound(1), StatusCode::NOT_FOUND),
      (Error::PhoneTaken, StatusCode::CONFLICT),
      (Error::AlreadyActive(PremiumFeature::IsVerified), StatusCode::CONFLICT),
      (Error::PasswordHash("bad salt".into()), StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (err, status) in cases {
      assert_eq!(ApiError::from(err).status(), status);
    }
  }

  #[test]
  fn message_is_the_core_display() {
    let err = ApiError::from(Error::AlreadyActive(PremiumFeature::UnlimitedSwipes));
    assert_eq!(err.to_string(), "unlimited swipes is already active");
  }
}
