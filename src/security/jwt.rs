//! Session token codec: HS256-signed, time-limited, stateless.
//!
//! Sessions are not stored server-side, which means there is no server-side
//! revocation: a token stays valid until its expiry even after logout or a
//! capability change on the user row. That staleness window is an accepted
//! tradeoff of the stateless design.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::User;

/// Claims embedded in a session token. `can_view_pokemon` is a snapshot
/// taken at issuance; changing the user row does not touch live tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: Uuid,
    pub username: String,
    pub can_view_pokemon: bool,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token cannot be decoded")]
    Malformed,

    #[error("token signature is invalid")]
    SignatureInvalid,

    #[error("token has expired")]
    Expired,
}

#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime: Duration,
}

impl TokenCodec {
    pub fn new(secret: &str, lifetime_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            lifetime: Duration::seconds(lifetime_secs),
        }
    }

    /// Issue a signed token for `user`, expiring `lifetime` after `now`.
    pub fn issue(&self, user: &User, now: DateTime<Utc>) -> Result<String> {
        let claims = AccessClaims {
            sub: user.id,
            username: user.username.clone(),
            can_view_pokemon: user.can_view_pokemon,
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| ApiError::Internal(format!("token signing failed: {e}")))
    }

    /// Verify signature and expiry against the caller-supplied clock.
    ///
    /// jsonwebtoken's wall-clock expiry validation is disabled so the
    /// decision is a pure function of (token, now, secret); the token is
    /// valid in `[iat, exp)` and expired at any `now >= exp`.
    pub fn verify(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> std::result::Result<AccessClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        validation.leeway = 0;

        let data =
            decode::<AccessClaims>(token, &self.decoding, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
                    _ => TokenError::Malformed,
                }
            })?;

        if now.timestamp() >= data.claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(data.claims)
    }
}
