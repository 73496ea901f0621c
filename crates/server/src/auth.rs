//! Credential hashing and bearer-token primitives.
//!
//! Passwords are hashed with argon2id (salted, so two hashes of the same
//! password differ but both verify). Tokens are HS256 JWTs carrying the
//! user's email as subject and an absolute expiry.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Tokens issued without an explicit ttl last 15 minutes.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 15;
/// The login flow issues longer-lived tokens on purpose.
pub const LOGIN_TOKEN_TTL_MINUTES: i64 = 30;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject: the user's email.
    sub: String,
    /// Absolute expiry, seconds since the epoch.
    exp: i64,
}

/// Process-wide signing material, built once at startup and shared read-only.
///
/// Rotating the secret invalidates every outstanding token; there is no
/// revocation list, tokens stay valid until natural expiry.
pub struct AuthKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl AuthKeys {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::default();
        // Zero leeway: a token is invalid the instant its expiry passes.
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issues a signed token for `subject` with the default ttl.
    pub fn issue(&self, subject: &str) -> Result<String, jsonwebtoken::errors::Error> {
        self.issue_with_ttl(subject, Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES))
    }

    /// Issues a signed token for `subject` expiring after `ttl`.
    pub fn issue_with_ttl(
        &self,
        subject: &str,
        ttl: Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            sub: subject.to_string(),
            exp: (Utc::now() + ttl).timestamp(),
        };
        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
    }

    /// Validates a token and returns its subject.
    ///
    /// Fails on a bad signature, a malformed token, a missing subject or an
    /// elapsed expiry. Never refreshes anything.
    pub fn validate(&self, token: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)?;
        Ok(data.claims.sub)
    }
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Returns false on mismatch or on an unparsable stored hash; verification
/// never surfaces an error to the caller.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
