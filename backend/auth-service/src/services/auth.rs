//! Account lifecycle state machine.
//!
//! Signup creates an unverified account and mails a six-digit OTP; the
//! account cannot sign in until the code is redeemed. Sign-in issues a
//! short-lived RS256 access token plus an opaque refresh token whose hash
//! is the account's single live session. Refresh rotates that session
//! atomically, so a replayed token always loses. Password reset is a
//! single-use token that also revokes the live session.

use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crypto_core::jwt;
use crypto_core::Role;

use crate::db::AccountStore;
use crate::error::{AuthError, Result};
use crate::models::{Account, AccountStats, NewAccount};
use crate::security::password::{hash_password, verify_password};
use crate::security::token::{
    generate_opaque_token, generate_otp, hash_token, REFRESH_TOKEN_LENGTH, RESET_TOKEN_LENGTH,
};
use crate::services::mailer::EmailService;
use crate::validators::{mask_email, normalize_email, validate_email, validate_otp_shape};

pub const OTP_TTL_MINUTES: i64 = 10;
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 7;
pub const RESET_TOKEN_TTL_MINUTES: i64 = 30;

/// Tokens issued by sign-in and refresh.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub account_id: Uuid,
    pub email: String,
    pub role: Role,
    pub access_token: String,
    pub refresh_token: String,
    /// Access-token lifetime in seconds.
    pub expires_in: i64,
}

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn AccountStore>,
    mailer: EmailService,
    allowed_email_domain: Option<String>,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn AccountStore>,
        mailer: EmailService,
        allowed_email_domain: Option<String>,
    ) -> Self {
        Self {
            store,
            mailer,
            allowed_email_domain,
        }
    }

    /// Register a new unverified account and attempt OTP delivery.
    ///
    /// Returns the account and whether the code was delivered. A delivery
    /// failure does not roll the account back; the caller can re-request a
    /// code with `send_otp`.
    pub async fn signup(&self, email: &str, password: &str) -> Result<(Account, bool)> {
        validate_email(email, self.allowed_email_domain.as_deref())?;
        let email = normalize_email(email);
        let password_hash = hash_password(password)?;

        let account = self
            .store
            .insert(NewAccount {
                id: Uuid::new_v4(),
                email: email.clone(),
                password_hash,
                role: Role::Member,
            })
            .await?;

        tracing::info!(account_id = %account.id, email = %mask_email(&email), "Account created");

        let otp_sent = match self.issue_otp(&account).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(account_id = %account.id, error = %e, "OTP delivery failed at signup");
                false
            }
        };

        Ok((account, otp_sent))
    }

    /// Issue a fresh OTP for an existing unverified account. Any previous
    /// pending code is overwritten.
    pub async fn send_otp(&self, email: &str) -> Result<i64> {
        validate_email(email, None)?;
        let email = normalize_email(email);

        let account = self
            .store
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::NotFound)?;

        if account.verified {
            return Err(AuthError::Validation(
                "Account is already verified".into(),
            ));
        }

        self.issue_otp(&account).await?;
        Ok(OTP_TTL_MINUTES * 60)
    }

    async fn issue_otp(&self, account: &Account) -> Result<()> {
        let code = generate_otp();
        let expires_at = Utc::now() + Duration::minutes(OTP_TTL_MINUTES);

        // Stored before delivery: a slow SMTP hop must not leave a code the
        // recipient holds but the store does not know about.
        self.store.store_otp(account.id, &code, expires_at).await?;
        self.mailer.send_otp_email(&account.email, &code).await?;

        tracing::info!(account_id = %account.id, "Verification code issued");
        Ok(())
    }

    /// Redeem a pending OTP, flipping the account to verified.
    ///
    /// The redemption is a compare-and-swap; when it loses, a follow-up
    /// read classifies the failure without consuming anything.
    pub async fn verify_otp(&self, email: &str, code: &str) -> Result<()> {
        validate_email(email, None)?;
        validate_otp_shape(code)?;
        let email = normalize_email(email);

        if self.store.redeem_otp(&email, code).await? {
            tracing::info!(email = %mask_email(&email), "Account verified");
            return Ok(());
        }

        let account = self
            .store
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::NotFound)?;

        match (&account.otp_code, account.otp_expires_at) {
            (None, _) => Err(AuthError::OtpMissing),
            (Some(_), Some(at)) if at <= Utc::now() => {
                // Expired codes are cleared on sight so a later attempt
                // reports "missing" rather than "expired" forever.
                self.store.clear_expired_otp(&email).await?;
                Err(AuthError::OtpExpired)
            }
            _ => Err(AuthError::OtpMismatch),
        }
    }

    /// Authenticate credentials and open a session.
    ///
    /// Replaces any existing refresh token: an account has at most one live
    /// session.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<TokenPair> {
        let email = normalize_email(email);

        let account = self
            .store
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &account.password_hash)? {
            tracing::warn!(email = %mask_email(&email), "Sign-in with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        if !account.verified {
            return Err(AuthError::NotVerified);
        }

        let pair = self.open_session(&account).await?;
        tracing::info!(account_id = %account.id, "Sign-in succeeded");
        Ok(pair)
    }

    async fn open_session(&self, account: &Account) -> Result<TokenPair> {
        let access_token = jwt::generate_access_token(account.id, account.role)?;
        let refresh_token = generate_opaque_token(REFRESH_TOKEN_LENGTH);
        let expires_at = Utc::now() + Duration::days(REFRESH_TOKEN_TTL_DAYS);

        self.store
            .store_refresh(account.id, &hash_token(&refresh_token), expires_at)
            .await?;

        Ok(TokenPair {
            account_id: account.id,
            email: account.email.clone(),
            role: account.role,
            access_token,
            refresh_token,
            expires_in: jwt::access_token_ttl_secs(),
        })
    }

    /// Rotate a refresh token: the presented token is consumed and a new
    /// pair is issued in one atomic step. A replayed, expired or unknown
    /// token gets `TokenInvalid` with nothing consumed.
    pub async fn refresh(&self, presented: &str) -> Result<TokenPair> {
        if presented.is_empty() {
            return Err(AuthError::TokenInvalid);
        }

        let new_token = generate_opaque_token(REFRESH_TOKEN_LENGTH);
        let expires_at = Utc::now() + Duration::days(REFRESH_TOKEN_TTL_DAYS);

        let account = self
            .store
            .rotate_refresh(&hash_token(presented), &hash_token(&new_token), expires_at)
            .await?
            .ok_or_else(|| {
                tracing::warn!("Refresh rejected: token unknown, expired, or already rotated");
                AuthError::TokenInvalid
            })?;

        let access_token = jwt::generate_access_token(account.id, account.role)?;
        tracing::info!(account_id = %account.id, "Refresh token rotated");

        Ok(TokenPair {
            account_id: account.id,
            email: account.email.clone(),
            role: account.role,
            access_token,
            refresh_token: new_token,
            expires_in: jwt::access_token_ttl_secs(),
        })
    }

    /// End the account's session by revoking its refresh token. Idempotent.
    pub async fn sign_out(&self, account_id: Uuid) -> Result<()> {
        self.store.clear_refresh(account_id).await?;
        tracing::info!(account_id = %account_id, "Signed out");
        Ok(())
    }

    /// Begin a password reset. Always reports success to the caller so the
    /// endpoint cannot be used to probe which addresses are registered.
    pub async fn request_reset(&self, email: &str) -> Result<()> {
        validate_email(email, None)?;
        let email = normalize_email(email);

        let Some(account) = self.store.find_by_email(&email).await? else {
            tracing::debug!(email = %mask_email(&email), "Reset requested for unknown address");
            return Ok(());
        };

        let token = generate_opaque_token(RESET_TOKEN_LENGTH);
        let expires_at = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);
        self.store
            .store_reset(account.id, &hash_token(&token), expires_at)
            .await?;

        if let Err(e) = self.mailer.send_reset_email(&account.email, &token).await {
            // Still reported as success: surfacing the failure would reveal
            // that the address is registered.
            tracing::error!(account_id = %account.id, error = %e, "Reset email delivery failed");
        } else {
            tracing::info!(account_id = %account.id, "Reset token issued");
        }

        Ok(())
    }

    /// Redeem a reset token: install the new password, consume the token,
    /// and revoke the live session in one atomic step.
    pub async fn redeem_reset(&self, token: &str, new_password: &str) -> Result<()> {
        if token.is_empty() {
            return Err(AuthError::TokenInvalid);
        }

        let new_hash = hash_password(new_password)?;

        let account = self
            .store
            .redeem_reset(&hash_token(token), &new_hash)
            .await?
            .ok_or(AuthError::TokenInvalid)?;

        tracing::info!(account_id = %account.id, "Password reset completed");
        Ok(())
    }

    pub async fn current_user(&self, account_id: Uuid) -> Result<Account> {
        self.store
            .find_by_id(account_id)
            .await?
            .ok_or(AuthError::NotFound)
    }

    pub async fn stats(&self) -> Result<AccountStats> {
        self.store.stats().await
    }
}
