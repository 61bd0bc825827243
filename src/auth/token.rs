use crate::error::{AppError, AuthError};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub exp: i64,    // Expiration time
    pub iat: i64,    // Issued at
}

/// Issues and validates stateless bearer tokens. Built from explicit
/// configuration so tests can run with their own secrets; there is no
/// ambient global key.
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    lifetime: Duration,
}

impl TokenSigner {
    pub fn new(secret: &str, algorithm: &str, lifetime: Duration) -> Result<Self, AppError> {
        // Only HMAC variants work with a shared secret.
        let algorithm = match algorithm {
            "HS256" => Algorithm::HS256,
            "HS384" => Algorithm::HS384,
            "HS512" => Algorithm::HS512,
            other => {
                return Err(AppError::Config(format!(
                    "unsupported signing algorithm: {}",
                    other
                )))
            }
        };

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            lifetime,
        })
    }

    pub fn issue(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + self.lifetime).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("token signing failed: {}", e)))
    }

    /// Tampered and expired tokens are rejected alike; the caller only
    /// learns `Unauthenticated`.
    pub fn validate(&self, token: &str) -> Result<Uuid, AuthError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| AuthError::Unauthenticated)?;

        Uuid::parse_str(&data.claims.sub).map_err(|_| AuthError::Unauthenticated)
    }
}
