//! Session token issuing and validation
//!
//! Tokens are HS256-signed JWTs carrying `{sub, iat, exp}`. The signing
//! secret is owned by a `TokenService` value that is built once at startup
//! and shared read-only afterwards; there is no global key storage.
//!
//! ```rust
//! use chrono::Duration;
//! use crypto_core::jwt::TokenService;
//!
//! let tokens = TokenService::ephemeral(Duration::minutes(30));
//! let token = tokens.issue("a@x.com").unwrap();
//! assert_eq!(tokens.validate(&token).unwrap().sub, "a@x.com");
//! ```

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

/// Shortest accepted HMAC secret, in bytes.
pub const MIN_SECRET_LENGTH: usize = 32;

/// Default access-token lifetime.
pub const DEFAULT_ACCESS_TOKEN_TTL_MINUTES: i64 = 30;

/// Longest accepted token lifetime (one year).
pub const MAX_ACCESS_TOKEN_TTL_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user email)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Internal rejection causes. Callers outside this crate should collapse all
/// validation variants into one "unauthenticated" outcome.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature mismatch")]
    SignatureMismatch,

    #[error("token expired")]
    Expired,

    #[error("failed to sign token: {0}")]
    Signing(String),

    #[error("signing secret must be at least {min} bytes, got {actual}")]
    WeakSecret { min: usize, actual: usize },

    #[error("token lifetime must be positive and at most one year")]
    InvalidTtl,
}

pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    default_ttl: Duration,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &JWT_ALGORITHM)
            .field("secret", &"[REDACTED]")
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}

impl TokenService {
    /// Build a service from an explicit secret.
    pub fn new(secret: &[u8], default_ttl: Duration) -> Result<Self, TokenError> {
        if secret.len() < MIN_SECRET_LENGTH {
            return Err(TokenError::WeakSecret {
                min: MIN_SECRET_LENGTH,
                actual: secret.len(),
            });
        }
        if !ttl_in_range(default_ttl) {
            return Err(TokenError::InvalidTtl);
        }

        Ok(Self::from_secret(secret, default_ttl))
    }

    /// Build a service around a fresh random secret that lives only in this
    /// process. Restarting the process invalidates every token it issued.
    pub fn ephemeral(default_ttl: Duration) -> Self {
        let mut secret = [0u8; MIN_SECRET_LENGTH];
        OsRng.fill_bytes(&mut secret);

        let ttl = if ttl_in_range(default_ttl) {
            default_ttl
        } else {
            Duration::minutes(DEFAULT_ACCESS_TOKEN_TTL_MINUTES)
        };

        Self::from_secret(&secret, ttl)
    }

    fn from_secret(secret: &[u8], default_ttl: Duration) -> Self {
        // Expiry is checked against the caller's clock in `validate_at`.
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        self.issue_at(subject, self.default_ttl, Utc::now())
    }

    pub fn issue_with_ttl(&self, subject: &str, ttl: Duration) -> Result<String, TokenError> {
        self.issue_at(subject, ttl, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        subject: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        if subject.is_empty() {
            return Err(TokenError::Malformed);
        }
        if !ttl_in_range(ttl) {
            return Err(TokenError::InvalidTtl);
        }
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or(TokenError::InvalidTtl)?;

        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        self.validate_at(token, Utc::now())
    }

    /// Validate a token against the clock reading `now`.
    ///
    /// A token is valid up to and including its `exp` second.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => TokenError::SignatureMismatch,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            }
        })?;

        let claims = data.claims;
        if claims.sub.is_empty() {
            return Err(TokenError::Malformed);
        }
        if now.timestamp() > claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

fn ttl_in_range(ttl: Duration) -> bool {
    ttl > Duration::zero() && ttl <= Duration::minutes(MAX_ACCESS_TOKEN_TTL_MINUTES)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"unit-test-secret-unit-test-secret!!";

    fn service() -> TokenService {
        TokenService::new(SECRET, Duration::minutes(30)).unwrap()
    }

    #[test]
    fn test_rejects_short_secret() {
        let err = TokenService::new(b"too-short", Duration::minutes(30)).unwrap_err();
        assert_eq!(
            err,
            TokenError::WeakSecret {
                min: MIN_SECRET_LENGTH,
                actual: 9
            }
        );
    }

    #[test]
    fn test_rejects_non_positive_ttl() {
        assert_eq!(
            TokenService::new(SECRET, Duration::zero()).unwrap_err(),
            TokenError::InvalidTtl
        );
    }

    #[test]
    fn test_rejects_oversized_ttl() {
        assert_eq!(
            TokenService::new(SECRET, Duration::days(200_000_000)).unwrap_err(),
            TokenError::InvalidTtl
        );
        let longest = Duration::minutes(MAX_ACCESS_TOKEN_TTL_MINUTES);
        assert!(TokenService::new(SECRET, longest).is_ok());

        let tokens = service();
        assert_eq!(
            tokens
                .issue_with_ttl("a@x.com", Duration::days(200_000_000))
                .unwrap_err(),
            TokenError::InvalidTtl
        );
    }

    #[test]
    fn test_expiry_overflow_is_an_error() {
        let tokens = service();
        let err = tokens
            .issue_at("a@x.com", Duration::minutes(30), DateTime::<Utc>::MAX_UTC)
            .unwrap_err();
        assert_eq!(err, TokenError::InvalidTtl);
    }

    #[test]
    fn test_claims_carry_subject_and_expiry() {
        let tokens = service();
        let now = Utc::now();
        let token = tokens.issue_at("a@x.com", Duration::minutes(30), now).unwrap();

        let claims = tokens.validate_at(&token, now).unwrap();
        assert_eq!(claims.sub, "a@x.com");
        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.exp, now.timestamp() + 30 * 60);
    }

    #[test]
    fn test_expiry_boundary() {
        let tokens = service();
        let issued = Utc::now();
        let ttl = Duration::minutes(30);
        let token = tokens.issue_at("a@x.com", ttl, issued).unwrap();

        assert!(tokens
            .validate_at(&token, issued + ttl - Duration::seconds(1))
            .is_ok());
        assert!(tokens.validate_at(&token, issued + ttl).is_ok());
        assert_eq!(
            tokens
                .validate_at(&token, issued + ttl + Duration::seconds(1))
                .unwrap_err(),
            TokenError::Expired
        );
    }

    #[test]
    fn test_empty_subject_is_refused() {
        assert_eq!(service().issue("").unwrap_err(), TokenError::Malformed);
    }

    #[test]
    fn test_garbage_is_malformed() {
        let tokens = service();
        assert_eq!(tokens.validate("").unwrap_err(), TokenError::Malformed);
        assert_eq!(
            tokens.validate("not.a.jwt").unwrap_err(),
            TokenError::Malformed
        );
    }

    #[test]
    fn test_debug_hides_secret() {
        let rendered = format!("{:?}", service());
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("unit-test-secret"));
    }

    #[test]
    fn test_ephemeral_services_do_not_trust_each_other() {
        let first = TokenService::ephemeral(Duration::minutes(30));
        let second = TokenService::ephemeral(Duration::minutes(30));
        let token = first.issue("a@x.com").unwrap();

        assert!(first.validate(&token).is_ok());
        assert_eq!(
            second.validate(&token).unwrap_err(),
            TokenError::SignatureMismatch
        );
    }
}
