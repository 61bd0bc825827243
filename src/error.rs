use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Auth(#[from] AuthError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

// Implement conversion from config::ConfigError
impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        // 5xx details stay in the logs, not in the response body
        let message = if status.is_server_error() {
            tracing::error!("request failed: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        let response = json!({
            "error": {
                "status": status.as_u16(),
                "message": message
            }
        });
        HttpResponse::build(status).json(response)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Auth(e) => match e {
                AuthError::DuplicateEmail => StatusCode::BAD_REQUEST,
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::InvalidOrExpiredToken => StatusCode::BAD_REQUEST,
                AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
            },
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Failures surfaced by the auth subsystem. The display strings double as the
/// HTTP error messages, so they must stay stable.
///
/// `InvalidCredentials` covers both unknown email and wrong password, and
/// `InvalidOrExpiredToken` covers both missing and expired verification
/// tokens; neither tells the caller which case occurred.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid or expired verification token")]
    InvalidOrExpiredToken,

    #[error("Invalid authentication token")]
    Unauthenticated,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Record not found")]
    NotFound,

    #[error("Duplicate record")]
    Duplicate,
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            // 23505 = unique_violation
            sqlx::Error::Database(e) if e.code().as_deref() == Some("23505") => {
                StoreError::Duplicate
            }
            sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                StoreError::Connection(err.to_string())
            }
            _ => StoreError::Query(err.to_string()),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Store(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Internal(_)));

        let config_err = config::ConfigError::NotFound(String::from("key not found"));
        let app_err: AppError = config_err.into();
        assert!(matches!(app_err, AppError::Config(_)));

        let store_err: StoreError = sqlx::Error::RowNotFound.into();
        assert!(matches!(store_err, StoreError::NotFound));
    }

    #[test]
    fn test_error_status_codes() {
        let err = AppError::Auth(AuthError::InvalidCredentials);
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);

        let err = AppError::Auth(AuthError::DuplicateEmail);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = AppError::Auth(AuthError::InvalidOrExpiredToken);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = AppError::Auth(AuthError::Unauthenticated);
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);

        let err = AppError::Store(StoreError::NotFound);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_display_matches_http_contract() {
        let err = AppError::Auth(AuthError::DuplicateEmail);
        assert_eq!(err.to_string(), "Email already registered");

        let err = AppError::Auth(AuthError::InvalidCredentials);
        assert_eq!(err.to_string(), "Invalid email or password");

        let err = AppError::Auth(AuthError::InvalidOrExpiredToken);
        assert_eq!(err.to_string(), "Invalid or expired verification token");
    }

    #[test]
    fn test_server_errors_hide_details() {
        let err = AppError::Store(StoreError::Connection("connection refused".into()));
        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
