use super::models::{User, VerificationToken};
use super::CredentialStore;
use crate::error::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub struct PgCredentialStore {
    pool: Arc<PgPool>,
}

impl PgCredentialStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    pub async fn new_with_options(
        url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(url)
            .await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    pub async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(self.pool.as_ref())
            .await
            .map_err(|e| StoreError::Query(e.to_string()))
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, display_name, is_verified, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.display_name)
        .bind(user.is_verified)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, display_name, is_verified, created_at, updated_at \
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, display_name, is_verified, created_at, updated_at \
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(user)
    }

    async fn mark_user_verified(&self, email: &str, now: DateTime<Utc>) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE users SET is_verified = TRUE, updated_at = $1 WHERE email = $2",
        )
        .bind(now)
        .bind(email)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn insert_verification_token(
        &self,
        token: &VerificationToken,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO verification_tokens (token, email, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&token.token)
        .bind(&token.email)
        .bind(token.created_at)
        .bind(token.expires_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn find_verification_token(
        &self,
        token: &str,
    ) -> Result<Option<VerificationToken>, StoreError> {
        let record = sqlx::query_as::<_, VerificationToken>(
            "SELECT token, email, created_at, expires_at FROM verification_tokens WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(record)
    }

    async fn delete_verification_token(&self, token: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM verification_tokens WHERE token = $1")
            .bind(token)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn delete_expired_verification_tokens(
        &self,
        now: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM verification_tokens WHERE expires_at < $1")
            .bind(now)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }
}
