//! In-memory [`CredentialStore`] used by the test suites and for running the
//! server without a database. Mirrors the Postgres implementation's
//! behavior, including the unique-email constraint.

use super::models::{User, VerificationToken};
use super::CredentialStore;
use crate::error::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    tokens: RwLock<HashMap<String, VerificationToken>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate);
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn mark_user_verified(&self, email: &str, now: DateTime<Utc>) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let user = users
            .values_mut()
            .find(|u| u.email == email)
            .ok_or(StoreError::NotFound)?;
        user.is_verified = true;
        user.updated_at = now;
        Ok(())
    }

    async fn insert_verification_token(
        &self,
        token: &VerificationToken,
    ) -> Result<(), StoreError> {
        let mut tokens = self.tokens.write().await;
        if tokens.contains_key(&token.token) {
            return Err(StoreError::Duplicate);
        }
        tokens.insert(token.token.clone(), token.clone());
        Ok(())
    }

    async fn find_verification_token(
        &self,
        token: &str,
    ) -> Result<Option<VerificationToken>, StoreError> {
        let tokens = self.tokens.read().await;
        Ok(tokens.get(token).cloned())
    }

    async fn delete_verification_token(&self, token: &str) -> Result<(), StoreError> {
        let mut tokens = self.tokens.write().await;
        tokens.remove(token);
        Ok(())
    }

    async fn delete_expired_verification_tokens(
        &self,
        now: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, t| t.expires_at >= now);
        Ok((before - tokens.len()) as u64)
    }
}
