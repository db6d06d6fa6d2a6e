use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AuthError>;

/// Unified error type for the auth service.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Password too weak: {0}")]
    WeakPassword(String),

    #[error("Email address is already registered")]
    DuplicateIdentity,

    #[error("No verification code is pending for this account")]
    OtpMissing,

    #[error("Verification code has expired")]
    OtpExpired,

    #[error("Incorrect verification code")]
    OtpMismatch,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account has not completed verification")]
    NotVerified,

    #[error("Invalid or expired token")]
    TokenInvalid,

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Insufficient role for this operation")]
    Forbidden,

    #[error("Account not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Stable machine-readable error kind, part of the response contract.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::Validation(_) => "validation_error",
            AuthError::WeakPassword(_) => "weak_password",
            AuthError::DuplicateIdentity => "duplicate_identity",
            AuthError::OtpMissing => "otp_missing",
            AuthError::OtpExpired => "otp_expired",
            AuthError::OtpMismatch => "otp_mismatch",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::NotVerified => "not_verified",
            AuthError::TokenInvalid => "token_invalid",
            AuthError::Unauthenticated => "unauthenticated",
            AuthError::Forbidden => "forbidden",
            AuthError::NotFound => "not_found",
            AuthError::Database(_) => "database_error",
            AuthError::Internal(_) => "internal_error",
        }
    }

    fn is_internal(&self) -> bool {
        matches!(self, AuthError::Database(_) | AuthError::Internal(_))
    }
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_)
            | AuthError::WeakPassword(_)
            | AuthError::OtpMissing
            | AuthError::OtpExpired
            | AuthError::OtpMismatch => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials
            | AuthError::TokenInvalid
            | AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthError::NotVerified | AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::NotFound => StatusCode::NOT_FOUND,
            AuthError::DuplicateIdentity => StatusCode::CONFLICT,
            AuthError::Database(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        // Internal detail (SQL text, SMTP failures) stays in the logs; the
        // wire message for 500s is generic outside debug builds.
        let message = if self.is_internal() && !cfg!(debug_assertions) {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        if self.is_internal() {
            tracing::error!(kind = self.kind(), error = %self, "Request failed");
        }

        HttpResponse::build(status).json(json!({
            "error": self.kind(),
            "message": message,
            "status": status.as_u16(),
        }))
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError::Internal(err.to_string())
    }
}
