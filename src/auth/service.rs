use crate::auth::password::PasswordHasher;
use crate::auth::token::TokenSigner;
use crate::auth::verification::{RedeemError, VerificationDelivery, VerificationTokens};
use crate::config::AuthConfig;
use crate::error::{AppError, AuthError, StoreError};
use crate::store::{CredentialStore, PublicUser, User};
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Fixed literal identifying the bearer scheme in login responses.
pub const TOKEN_TYPE: &str = "bearer";

#[derive(Debug, Clone)]
pub struct Registration {
    pub user_id: Uuid,
    pub requires_verification: bool,
}

#[derive(Debug, Clone)]
pub struct Login {
    pub access_token: String,
    pub token_type: &'static str,
    pub user: PublicUser,
}

/// Orchestrates registration, login, email verification and token-based
/// identity. Sole owner of the write path to users and verification tokens.
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    signer: TokenSigner,
    verification: VerificationTokens,
    delivery: Arc<dyn VerificationDelivery>,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        delivery: Arc<dyn VerificationDelivery>,
        config: &AuthConfig,
    ) -> Result<Self, AppError> {
        let signer = TokenSigner::new(
            &config.jwt_secret,
            &config.jwt_algorithm,
            Duration::days(config.token_expiry_days),
        )?;
        let verification = VerificationTokens::new(
            store.clone(),
            Duration::hours(config.verification_token_expiry_hours),
        );

        Ok(Self {
            store,
            hasher: PasswordHasher::new(config.bcrypt_cost),
            signer,
            verification,
            delivery,
        })
    }

    /// Creates an unverified user and hands a fresh verification token to
    /// the delivery channel. Neither the password hash nor the raw token is
    /// returned.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<Registration, AppError> {
        if self.store.find_user_by_email(email).await?.is_some() {
            return Err(AuthError::DuplicateEmail.into());
        }

        let password_hash = self.hasher.hash(password)?;
        let user = User::new(
            email.to_string(),
            password_hash,
            display_name.map(str::to_string),
        );

        // The unique index backstops the window between the check above and
        // this insert.
        match self.store.insert_user(&user).await {
            Ok(()) => {}
            Err(StoreError::Duplicate) => return Err(AuthError::DuplicateEmail.into()),
            Err(e) => return Err(e.into()),
        }

        let token = self.verification.issue(email).await?;
        self.delivery.deliver(email, &token).await?;

        info!(user_id = %user.id, "registered new user");
        Ok(Registration {
            user_id: user.id,
            requires_verification: true,
        })
    }

    /// Unknown email and wrong password surface the identical error, so a
    /// caller cannot probe which accounts exist. Unverified users may log
    /// in; verification gates nothing here by design.
    pub async fn login(&self, email: &str, password: &str) -> Result<Login, AppError> {
        let user = self
            .store
            .find_user_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.hasher.verify(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials.into());
        }

        let access_token = self.signer.issue(user.id)?;
        debug!(user_id = %user.id, "login succeeded");
        Ok(Login {
            access_token,
            token_type: TOKEN_TYPE,
            user: user.public(),
        })
    }

    /// Redeems a verification token and flips the user's verified flag.
    /// Redemption consumes the token, so a repeat call fails.
    pub async fn verify_email(&self, token: &str) -> Result<(), AppError> {
        let email = match self.verification.redeem(token).await {
            Ok(email) => email,
            Err(e @ (RedeemError::NotFound | RedeemError::Expired)) => {
                // Logged distinctly; the caller sees one undifferentiated kind
                debug!("email verification rejected: {}", e);
                return Err(AuthError::InvalidOrExpiredToken.into());
            }
            Err(RedeemError::Store(e)) => return Err(e.into()),
        };

        self.store.mark_user_verified(&email, Utc::now()).await?;
        info!("email verified for {}", email);
        Ok(())
    }

    /// Contract exposed to the rest of the platform: a bearer token proves
    /// an identity without any session record.
    pub fn validate_token(&self, token: &str) -> Result<Uuid, AppError> {
        Ok(self.signer.validate(token)?)
    }

    /// Resolves a bearer token to its user. A token for a since-deleted
    /// user fails here, not at signature validation.
    pub async fn current_user(&self, token: &str) -> Result<PublicUser, AppError> {
        let user_id = self.signer.validate(token)?;

        let user = self
            .store
            .find_user_by_id(user_id)
            .await?
            .ok_or(AuthError::Unauthenticated)?;

        Ok(user.public())
    }
}
