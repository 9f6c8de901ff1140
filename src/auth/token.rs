use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject of the token: the user's id.
    pub sub: i32,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Unique token id, so two tokens issued in the same second still differ.
    pub jti: Uuid,
}

/// Why a presented token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// The token could not be parsed or decoded.
    Malformed,
    /// The token is past its expiry.
    Expired,
    /// The signature does not match the server secret.
    InvalidSignature,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenError::Malformed => write!(f, "Malformed token"),
            TokenError::Expired => write!(f, "Token expired"),
            TokenError::InvalidSignature => write!(f, "Invalid token signature"),
        }
    }
}

/// Issues and verifies HS256 session tokens.
///
/// Built once at startup from the configured secret and shared read-only by
/// every request. Tokens are stateless: nothing is persisted and there is no
/// revocation, a token stays valid until `exp`.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Lifetime of newly issued tokens.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Generates a signed token for `user_id`, expiring `ttl` from now.
    ///
    /// # Returns
    /// Returns `AppError::InternalServerError` if the expiry is not a representable
    /// date or encoding fails.
    pub fn issue(&self, user_id: i32) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now.checked_add_signed(self.ttl).ok_or_else(|| {
            AppError::InternalServerError(format!(
                "token lifetime of {}s overflows the expiry date",
                self.ttl.num_seconds()
            ))
        })?;
        let claims = Claims {
            sub: user_id,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4(),
        };
        self.sign(&claims)
    }

    /// Verifies a token and returns its claims.
    ///
    /// Expiry is checked before the signature, so an expired token is reported as
    /// `Expired` whichever key signed it. Expiry has no leeway: the token is
    /// rejected once `now >= exp`.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = Self::peek(token)?;

        if Utc::now().timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::InvalidSignature
                }
                _ => TokenError::Malformed,
            })
    }

    /// Decodes the claims without checking the signature.
    fn peek(token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;

        decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::Malformed)
    }

    fn sign(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }
}
