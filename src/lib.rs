pub mod auth;
pub mod config;
pub mod error;
pub mod store;

use actix_web::HttpResponse;
use std::sync::Arc;
use std::time::Duration;

pub use auth::{AuthService, LoggingDelivery, VerificationDelivery};
pub use config::Settings;
pub use error::{AppError, AuthError, StoreError};
pub use store::{CredentialStore, MemoryStore, PgCredentialStore};

pub type Result<T> = std::result::Result<T, AppError>;

/// Health check endpoint handler
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "MoodMaps API - Social Emotional Platform",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    /// Connects to Postgres and wires the auth service against it.
    pub async fn new(config: Settings) -> Result<Self> {
        let store = PgCredentialStore::new_with_options(
            &config.database.url,
            config.database.max_connections,
            Duration::from_secs(5),
        )
        .await?;
        store.run_migrations().await?;

        Self::with_store(config, Arc::new(store), Arc::new(LoggingDelivery))
    }

    /// Wires the auth service against any store and delivery channel; tests
    /// use this with [`MemoryStore`].
    pub fn with_store(
        config: Settings,
        store: Arc<dyn CredentialStore>,
        delivery: Arc<dyn VerificationDelivery>,
    ) -> Result<Self> {
        let auth = AuthService::new(store, delivery, &config.auth)?;
        Ok(Self {
            config: Arc::new(config),
            auth: Arc::new(auth),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_app_state_with_memory_store() {
        let config = Settings::new_for_test().expect("Failed to load test config");
        let state = AppState::with_store(
            config,
            Arc::new(MemoryStore::new()),
            Arc::new(LoggingDelivery),
        )
        .expect("Failed to build state");

        let cloned = state.clone();
        assert!(Arc::ptr_eq(&state.config, &cloned.config));
        assert!(Arc::ptr_eq(&state.auth, &cloned.auth));
    }

    #[tokio::test]
    async fn test_app_state_rejects_bad_algorithm() {
        let mut config = Settings::new_for_test().expect("Failed to load test config");
        config.auth.jwt_algorithm = "none".to_string();

        let result = AppState::with_store(
            config,
            Arc::new(MemoryStore::new()),
            Arc::new(LoggingDelivery),
        );
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
