//! HS256 bearer tokens.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use spark_core::{account::TokenIssuer, user::UserId};
use tracing::debug;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
  pub sub: UserId,
  pub iat: i64,
  pub exp: i64,
}

/// Signing and verification keys derived from a shared secret.
#[derive(Clone)]
pub struct JwtKeys {
  encoding: EncodingKey,
  decoding: DecodingKey,
  ttl:      Duration,
}

impl JwtKeys {
  pub fn new(secret: &str, ttl: Duration) -> Self {
    Self {
      encoding: EncodingKey::from_secret(secret.as_bytes()),
      decoding: DecodingKey::from_secret(secret.as_bytes()),
      ttl,
    }
  }

  /// Sign a token for `user_id` issued at `now`.
  pub fn sign_at(
    &self,
    user_id: UserId,
    now: DateTime<Utc>,
  ) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
      sub: user_id,
      iat: now.timestamp(),
      exp: (now + self.ttl).timestamp(),
    };
    let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
    debug!(user_id, "jwt signed");
    Ok(token)
  }

  /// Check the signature and expiry of `token`.
  pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))?;
    debug!(user_id = data.claims.sub, "jwt verified");
    Ok(data.claims)
  }
}

impl TokenIssuer for JwtKeys {
  type Error = jsonwebtoken::errors::Error;

  fn issue(&self, user_id: UserId) -> Result<String, Self::Error> {
    self.sign_at(user_id, Utc::now())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn keys(secret: &str) -> JwtKeys { JwtKeys::new(secret, Duration::hours(24)) }

  #[test]
  fn issue_and_verify() {
    let k = keys("dev-secret");
    let token = k.issue(42).expect("sign");
    let claims = k.verify(&token).expect("verify");
    assert_eq!(claims.sub, 42);
    assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
  }

  #[test]
  fn rejects_other_secret() {
    let token = keys("one").issue(1).unwrap();
    assert!(keys("two").verify(&token).is_err());
  }

  #[test]
  fn rejects_expired_token() {
    let k = keys("dev-secret");
    let token = k.sign_at(1, Utc::now() - Duration::days(2)).unwrap();
    let err = k.verify(&token).unwrap_err();
    assert!(matches!(err.kind(), jsonwebtoken::errors::ErrorKind::ExpiredSignature), "{err:?}");
  }

  #[test]
  fn rejects_garbage() {
    assert!(keys("dev-secret").verify("not.a.token").is_err());
  }
}
