/**
 * Session Tokens
 *
 * JWT helpers shared by the in-memory store (which issues its own HS256
 * tokens) and the elevated session cache (which only needs to know whether
 * a cached backend token has expired).
 */

#[cfg(feature = "ssr")]
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

/// Lifetime of tokens issued by the memory store (7 days)
pub const TOKEN_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Record ID
    pub sub: String,
    /// Auth collection the record belongs to (`users`, `_superusers`)
    pub collection: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
    /// Token ID, keeps tokens issued in the same second distinct
    pub jti: String,
}

impl Claims {
    /// Claims issued now and valid for `ttl_secs`
    pub fn new(sub: impl Into<String>, collection: impl Into<String>, ttl_secs: u64) -> Self {
        let now = unix_now();
        Self {
            sub: sub.into(),
            collection: collection.into(),
            exp: now + ttl_secs,
            iat: now,
            jti: uuid::Uuid::new_v4().to_string(),
        }
    }
}

/// Only the expiry is read from foreign tokens
#[derive(Debug, Deserialize)]
struct ExpiryOnly {
    #[allow(dead_code)]
    exp: u64,
}

fn unix_now() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default()
}

/// Create an HS256 token
///
/// # Arguments
/// * `secret` - Signing secret
/// * `claims` - Claims to sign
///
/// # Returns
/// JWT token string
#[cfg(feature = "ssr")]
pub fn create_token(secret: &str, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::new(Algorithm::HS256), claims, &key)
}

/// Verify and decode an HS256 token
///
/// # Returns
/// Decoded claims or error (bad signature, malformed, expired)
#[cfg(feature = "ssr")]
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &key, &validation)?;
    Ok(token_data.claims)
}

/// Whether a backend-issued token carries an `exp` in the past
///
/// The signature is not checked; the backend remains the authority. Tokens
/// that cannot be decoded are treated as live and left for the backend to
/// reject with a 401.
#[cfg(feature = "ssr")]
pub fn token_expired(token: &str) -> bool {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_aud = false;
    validation.leeway = 0;

    match decode::<ExpiryOnly>(token, &DecodingKey::from_secret(&[]), &validation) {
        Ok(_) => false,
        Err(e) => matches!(e.kind(), ErrorKind::ExpiredSignature),
    }
}
