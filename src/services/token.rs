//! Session token issue and verification.
//!
//! DESIGN
//! ======
//! Sessions are stateless HS256 JWTs carrying `{sub, role, exp}`. There is
//! no refresh or revocation path: logout is purely client-side token
//! deletion, and a token stays valid until its fixed ten-day expiry.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::Duration;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::services::account::Role;

const TOKEN_TTL: Duration = Duration::days(10);

/// Signing and verification keys derived from the process-wide secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Claims carried by every session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    pub exp: i64,
}

/// Decoded request identity. One shape everywhere: handlers never see a raw
/// id or a partially-populated user object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub id: Uuid,
    pub role: Role,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token rejected: {0}")]
    Rejected(#[from] jsonwebtoken::errors::Error),
}

/// Issue a session token for the given user.
///
/// # Errors
///
/// Returns an error if claim serialization or signing fails.
pub fn issue(keys: &TokenKeys, user_id: Uuid, role: Role) -> Result<String, TokenError> {
    issue_with_ttl(keys, user_id, role, TOKEN_TTL)
}

pub(crate) fn issue_with_ttl(
    keys: &TokenKeys,
    user_id: Uuid,
    role: Role,
    ttl: Duration,
) -> Result<String, TokenError> {
    let exp = (OffsetDateTime::now_utc() + ttl).unix_timestamp();
    let claims = Claims { sub: user_id, role, exp };
    Ok(encode(&Header::default(), &claims, &keys.encoding)?)
}

/// Verify a token's signature and expiry and extract the identity.
///
/// # Errors
///
/// Returns an error for a malformed, tampered, or expired token.
pub fn verify(keys: &TokenKeys, token: &str) -> Result<Identity, TokenError> {
    let data = decode::<Claims>(token, &keys.decoding, &Validation::default())?;
    Ok(Identity { id: data.claims.sub, role: data.claims.role })
}

#[cfg(test)]
#[path = "token_test.rs"]
mod tests;
