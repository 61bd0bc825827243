use crate::error::{AppError, StoreError};
use crate::store::{CredentialStore, VerificationToken};
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Why a redemption failed. Kept internal for logging; callers only see a
/// single invalid-or-expired error.
#[derive(Error, Debug)]
pub enum RedeemError {
    #[error("verification token not found")]
    NotFound,

    #[error("verification token expired")]
    Expired,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Issues and redeems the single-use email-verification tokens.
pub struct VerificationTokens {
    store: Arc<dyn CredentialStore>,
    lifetime: Duration,
}

impl VerificationTokens {
    pub fn new(store: Arc<dyn CredentialStore>, lifetime: Duration) -> Self {
        Self { store, lifetime }
    }

    pub async fn issue(&self, email: &str) -> Result<String, AppError> {
        let token = generate_token();
        let record = VerificationToken::new(email.to_string(), token.clone(), self.lifetime);
        self.store.insert_verification_token(&record).await?;
        Ok(token)
    }

    /// Deletes the row on success, so a second redemption of the same token
    /// misses the lookup. An expired row is left in place.
    pub async fn redeem(&self, token: &str) -> Result<String, RedeemError> {
        let record = self
            .store
            .find_verification_token(token)
            .await?
            .ok_or(RedeemError::NotFound)?;

        if record.is_expired() {
            return Err(RedeemError::Expired);
        }

        self.store.delete_verification_token(token).await?;
        Ok(record.email)
    }
}

/// 32 bytes from the OS RNG, base64url without padding.
fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Delivery of a verification token to its email address is an external
/// concern (an email provider in production).
#[async_trait]
pub trait VerificationDelivery: Send + Sync {
    async fn deliver(&self, email: &str, token: &str) -> Result<(), AppError>;
}

/// Default delivery: record that a token went out. The token itself must
/// never reach the logs.
pub struct LoggingDelivery;

#[async_trait]
impl VerificationDelivery for LoggingDelivery {
    async fn deliver(&self, email: &str, _token: &str) -> Result<(), AppError> {
        info!("verification token issued for {}", email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn issuer(store: Arc<MemoryStore>, lifetime: Duration) -> VerificationTokens {
        VerificationTokens::new(store, lifetime)
    }

    #[test]
    fn test_generated_tokens_are_unique_and_opaque() {
        let first = generate_token();
        let second = generate_token();
        assert_ne!(first, second);
        // 32 bytes -> 43 base64url chars
        assert_eq!(first.len(), 43);
    }

    #[tokio::test]
    async fn test_issue_persists_row_with_expiry() {
        let store = Arc::new(MemoryStore::new());
        let tokens = issuer(store.clone(), Duration::hours(24));

        let token = tokens.issue("alice@example.com").await.unwrap();
        let record = store.find_verification_token(&token).await.unwrap().unwrap();
        assert_eq!(record.email, "alice@example.com");
        assert_eq!(record.expires_at - record.created_at, Duration::hours(24));
    }

    #[tokio::test]
    async fn test_redeem_consumes_token() {
        let store = Arc::new(MemoryStore::new());
        let tokens = issuer(store.clone(), Duration::hours(24));

        let token = tokens.issue("alice@example.com").await.unwrap();
        let email = tokens.redeem(&token).await.unwrap();
        assert_eq!(email, "alice@example.com");

        // Row was deleted, so the second attempt misses
        assert!(matches!(
            tokens.redeem(&token).await.unwrap_err(),
            RedeemError::NotFound
        ));
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let store = Arc::new(MemoryStore::new());
        let tokens = issuer(store, Duration::hours(24));
        assert!(matches!(
            tokens.redeem("no-such-token").await.unwrap_err(),
            RedeemError::NotFound
        ));
    }

    #[tokio::test]
    async fn test_expired_token_left_in_place() {
        let store = Arc::new(MemoryStore::new());
        let tokens = issuer(store.clone(), Duration::hours(-1));

        let token = tokens.issue("alice@example.com").await.unwrap();
        assert!(matches!(
            tokens.redeem(&token).await.unwrap_err(),
            RedeemError::Expired
        ));
        // No cleanup on rejection; the row stays until swept
        assert!(store.find_verification_token(&token).await.unwrap().is_some());
    }
}
