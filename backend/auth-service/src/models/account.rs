use chrono::{DateTime, Utc};
use crypto_core::Role;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// An account row. Secret material (password hash, token hashes, pending
/// OTP) never leaves this type in an outward representation; handlers map
/// it to response DTOs explicitly.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub verified: bool,
    pub otp_code: Option<String>,
    pub otp_expires_at: Option<DateTime<Utc>>,
    pub refresh_token_hash: Option<String>,
    pub refresh_expires_at: Option<DateTime<Utc>>,
    pub reset_token_hash: Option<String>,
    pub reset_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create an account row.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Aggregate counts for the admin analytics endpoint.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct AccountStats {
    pub total_accounts: i64,
    pub verified_accounts: i64,
    pub admin_accounts: i64,
}

// ---- Request DTOs ----

#[derive(Debug, Deserialize, ToSchema)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SendOtpRequest {
    pub email: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

// ---- Response DTOs ----

#[derive(Debug, Serialize, ToSchema)]
pub struct SignupResponse {
    pub account_id: Uuid,
    pub email: String,
    pub verified: bool,
    pub otp_sent: bool,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OtpSentResponse {
    pub message: String,
    /// Seconds until the pending code expires.
    pub expires_in: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SigninResponse {
    pub account_id: Uuid,
    pub email: String,
    pub role: String,
    pub access_token: String,
    pub refresh_token: String,
    /// Access-token lifetime in seconds.
    pub expires_in: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CurrentUserResponse {
    pub account_id: Uuid,
    pub email: String,
    pub role: String,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for CurrentUserResponse {
    fn from(account: &Account) -> Self {
        Self {
            account_id: account.id,
            email: account.email.clone(),
            role: account.role.to_string(),
            verified: account.verified,
            created_at: account.created_at,
        }
    }
}
