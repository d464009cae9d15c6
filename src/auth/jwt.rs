//! HS256 access tokens.

use crate::Error;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Access token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: String,
    /// Expiration time (Unix timestamp).
    pub exp: u64,
    /// Issued at (Unix timestamp).
    pub iat: u64,
}

/// A freshly issued token together with its lifetime.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: u64,
}

/// Issues and validates access tokens with a shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    /// Issue a token for `user_id`.
    pub fn issue(&self, user_id: Uuid) -> Result<IssuedToken, Error> {
        let now = unix_now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: now + self.ttl.as_secs(),
            iat: now,
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| Error::Internal(format!("failed to sign token: {}", e)))?;

        Ok(IssuedToken {
            token,
            expires_in: self.ttl.as_secs(),
        })
    }

    /// Validate a token and return the user ID it was issued for.
    pub fn validate(&self, token: &str) -> Result<Uuid, Error> {
        let validation = Validation::new(Algorithm::HS256);

        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    tracing::debug!("token expired");
                }
                jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => {
                    tracing::debug!("unexpected signing algorithm");
                }
                _ => tracing::debug!("token validation failed: {}", e),
            }
            Error::InvalidAuthentication
        })?;

        Uuid::parse_str(&data.claims.sub).map_err(|_| {
            tracing::debug!("token subject is not a user id");
            Error::InvalidAuthentication
        })
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}
