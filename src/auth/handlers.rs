use crate::error::{AppError, AuthError};
use crate::store::PublicUser;
use crate::AppState;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: Uuid,
    pub requires_verification: bool,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub user: PublicUser,
}

#[derive(Debug, Deserialize)]
pub struct VerifyEmailRequest {
    pub token: String,
}

pub async fn register(
    req: web::Json<RegisterRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received registration request for email: {}", req.email);

    let registration = state
        .auth
        .register(&req.email, &req.password, req.display_name.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(RegisterResponse {
        message: "User registered successfully. Please check your email for verification."
            .to_string(),
        user_id: registration.user_id,
        requires_verification: registration.requires_verification,
    }))
}

pub async fn login(
    req: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received login request for email: {}", req.email);

    match state.auth.login(&req.email, &req.password).await {
        Ok(login) => Ok(HttpResponse::Ok().json(LoginResponse {
            access_token: login.access_token,
            token_type: login.token_type,
            user: login.user,
        })),
        Err(e) => {
            warn!("Login failed for email: {}", req.email);
            Err(e)
        }
    }
}

pub async fn verify_email(
    req: web::Json<VerifyEmailRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    state.auth.verify_email(&req.token).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Email verified successfully"
    })))
}

pub async fn me(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let token = bearer_token(&req)?;
    let user = state.auth.current_user(token).await?;
    Ok(HttpResponse::Ok().json(user))
}

fn bearer_token(req: &HttpRequest) -> Result<&str, AppError> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| AuthError::Unauthenticated.into())
}
