//! Session token issuance and verification
//!
//! Tokens are HMAC-SHA256 signed JWTs carrying the account's identity
//! claims and a fixed validity window (6 hours by default). They are
//! stateless: verification needs only the signing secret, and a token
//! cannot be revoked once issued - it is valid until its expiry passes.

use authd_core::config::AuthConfig;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

use super::models::Account;

/// Identity claims embedded and signed inside a session token
///
/// Signed, not encrypted: clients and intermediaries can read these fields
/// but cannot forge them without the signing secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - account ID
    pub sub: String,
    /// Account's display name
    pub name: String,
    /// Account's email address
    pub email: String,
    /// Issued at timestamp (Unix epoch)
    pub iat: u64,
    /// Expiration timestamp (Unix epoch)
    pub exp: u64,
}

/// Token issuance and verification errors
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    Encoding(jsonwebtoken::errors::Error),

    #[error("Token is malformed")]
    Malformed,

    #[error("Token has expired")]
    Expired,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("System time error: {0}")]
    SystemTime(#[from] std::time::SystemTimeError),
}

/// Issue a signed session token for an authenticated account
///
/// Sets `iat` to the current time and `exp` to `iat` plus the configured
/// validity window.
pub fn issue_token(config: &AuthConfig, account: &Account) -> Result<String, TokenError> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();

    let claims = Claims {
        sub: account.id.to_string(),
        name: account.name.clone(),
        email: account.email.clone(),
        iat: now,
        exp: now + config.token_expiration_secs,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.token_secret.as_bytes()),
    )
    .map_err(TokenError::Encoding)
}

/// Verify a session token's signature and expiry and extract its claims
///
/// Performs no datastore lookup; resolving the claims against a live
/// account record is a separate, composed step in the middleware chain.
pub fn verify_token(config: &AuthConfig, token: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.token_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        _ => TokenError::Malformed,
    })?;

    Ok(token_data.claims)
}
