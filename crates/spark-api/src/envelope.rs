//! The `{"data": ...}` success envelope.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::Serialize;

/// A successful response body, rendered as `{"data": <T>}`.
pub struct Data<T>(pub StatusCode, pub T);

impl<T: Serialize> Data<T> {
  pub fn ok(value: T) -> Self { Data(StatusCode::OK, value) }

  pub fn created(value: T) -> Self { Data(StatusCode::CREATED, value) }
}

#[derive(Debug, Serialize)]
struct Envelope<T> {
  data: T,
}

impl<T: Serialize> IntoResponse for Data<T> {
  fn into_response(self) -> Response {
    (self.0, Json(Envelope { data: self.1 })).into_response()
  }
}

/// `{"message": "..."}`
#[derive(Debug, Serialize)]
pub struct Message {
  pub message: &'static str,
}

impl Message {
  pub fn new(message: &'static str) -> Self { Self { message } }
}
