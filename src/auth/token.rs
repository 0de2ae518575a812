//! Session token codec
//!
//! Issues and verifies signed, time-limited session tokens (HS256 JWTs).
//! Tokens are the only session state in the system: nothing is stored
//! server-side, so a token stays valid until its natural expiry and the
//! same secret must be used to verify that was used to sign.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity claims embedded in every session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Standard JWT subject, set to the user id
    pub sub: Uuid,
    /// Username at issuance time
    pub username: String,
    /// Issued-at (Unix timestamp, seconds)
    pub iat: i64,
    /// Expiry (Unix timestamp, seconds)
    pub exp: i64,
}

impl Claims {
    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// Errors that can occur when verifying a token.
///
/// The HTTP boundary collapses all three into a single 401 so callers
/// cannot tell which check failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("Token cannot be parsed")]
    Malformed,

    #[error("Token signature does not match")]
    InvalidSignature,

    #[error("Token is expired")]
    Expired,
}

/// Codec for session tokens, constructed once at startup from the
/// configured signing secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validity: Duration,
}

impl TokenCodec {
    pub fn new(secret: &str, validity: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validity,
        }
    }

    /// The validity window in seconds, used as the cookie Max-Age.
    pub fn max_age_seconds(&self) -> i64 {
        self.validity.num_seconds()
    }

    /// Issue a signed token for the given identity.
    pub fn issue(&self, user_id: Uuid, username: &str) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            username: username.to_string(),
            iat: now.timestamp(),
            exp: (now + self.validity).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| TokenError::Malformed)
    }

    /// Verify a token and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Exact expiry: now > exp is rejected, no grace window.
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            }
        })?;

        Ok(data.claims)
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("validity", &self.validity)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new("test-secret-key", Duration::hours(24))
    }

    #[test]
    fn test_issue_verify_roundtrip() {
        let codec = codec();
        let user_id = Uuid::new_v4();

        let token = codec.issue(user_id, "tester").unwrap();
        let claims = codec.verify(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.username, "tester");
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_expired_token_rejected() {
        let codec = TokenCodec::new("test-secret-key", Duration::hours(-1));
        let token = codec.issue(Uuid::new_v4(), "tester").unwrap();

        assert_eq!(codec.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = codec().issue(Uuid::new_v4(), "tester").unwrap();
        let other = TokenCodec::new("another-secret", Duration::hours(24));

        assert_eq!(other.verify(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_garbage_token_is_malformed() {
        assert_eq!(codec().verify("not.a.jwt"), Err(TokenError::Malformed));
        assert_eq!(codec().verify(""), Err(TokenError::Malformed));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let codec = codec();
        let token = codec.issue(Uuid::new_v4(), "tester").unwrap();

        // Swap the payload segment for another token's payload; the
        // signature no longer covers it.
        let other = codec.issue(Uuid::new_v4(), "intruder").unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        parts[1] = other_parts[1];
        let tampered = parts.join(".");

        assert_eq!(codec.verify(&tampered), Err(TokenError::InvalidSignature));
    }
}
