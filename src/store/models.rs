use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub display_name: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// A missing display name falls back to the local part of the email.
    pub fn new(email: String, password_hash: String, display_name: Option<String>) -> Self {
        let now = Utc::now();
        let display_name = display_name
            .or_else(|| email.split('@').next().map(str::to_string));
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            display_name,
            is_verified: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Projection safe to return to callers: the password hash never
    /// crosses this boundary.
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            is_verified: self.is_verified,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Single-use credential proving control of an email address. Consumed on
/// redemption; expired rows stay in place until someone looks them up.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VerificationToken {
    pub token: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl VerificationToken {
    pub fn new(email: String, token: String, lifetime: Duration) -> Self {
        let now = Utc::now();
        Self {
            token,
            email,
            created_at: now,
            expires_at: now + lifetime,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_defaults_to_local_part() {
        let user = User::new("alice@example.com".to_string(), "digest".to_string(), None);
        assert_eq!(user.display_name.as_deref(), Some("alice"));
        assert!(!user.is_verified);
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn test_explicit_display_name_wins() {
        let user = User::new(
            "alice@example.com".to_string(),
            "digest".to_string(),
            Some("Alice".to_string()),
        );
        assert_eq!(user.display_name.as_deref(), Some("Alice"));
    }

    #[test]
    fn test_public_projection_has_no_hash() {
        let user = User::new("alice@example.com".to_string(), "digest".to_string(), None);
        let public = user.public();
        let json = serde_json::to_string(&public).unwrap();
        assert!(!json.contains("digest"));
        assert!(!json.contains("password_hash"));
    }

    #[test]
    fn test_verification_token_expiry() {
        let fresh = VerificationToken::new(
            "alice@example.com".to_string(),
            "tok".to_string(),
            Duration::hours(24),
        );
        assert!(!fresh.is_expired());
        assert_eq!(fresh.expires_at - fresh.created_at, Duration::hours(24));

        let stale = VerificationToken::new(
            "alice@example.com".to_string(),
            "tok".to_string(),
            Duration::hours(-1),
        );
        assert!(stale.is_expired());
    }
}
