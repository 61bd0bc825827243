//! Persistence for users and verification tokens.
//!
//! The auth service owns the only write path to both record types and talks
//! to storage exclusively through [`CredentialStore`], so tests can swap the
//! Postgres implementation for the in-memory one (or a mock).

mod memory;
mod models;
mod postgres;

pub use memory::MemoryStore;
pub use models::{PublicUser, User, VerificationToken};
pub use postgres::PgCredentialStore;

use crate::error::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Returns `StoreError::Duplicate` when the email is already taken.
    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Flips `is_verified` and refreshes `updated_at`.
    async fn mark_user_verified(&self, email: &str, now: DateTime<Utc>) -> Result<(), StoreError>;

    async fn insert_verification_token(
        &self,
        token: &VerificationToken,
    ) -> Result<(), StoreError>;

    async fn find_verification_token(
        &self,
        token: &str,
    ) -> Result<Option<VerificationToken>, StoreError>;

    async fn delete_verification_token(&self, token: &str) -> Result<(), StoreError>;

    /// Housekeeping only. Redemption rejects expired rows whether or not this
    /// has run.
    async fn delete_expired_verification_tokens(
        &self,
        now: DateTime<Utc>,
    ) -> Result<u64, StoreError>;
}
