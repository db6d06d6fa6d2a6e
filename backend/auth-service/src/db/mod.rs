//! Account persistence.
//!
//! Handlers and services talk to storage through the [`AccountStore`]
//! trait; `PgAccountStore` is the production implementation and
//! `MemoryAccountStore` backs tests that exercise the full state machine
//! without a database.
//!
//! Every single-use transition (OTP redemption, refresh rotation, reset
//! redemption) is a compare-and-swap: one conditional update whose matched
//! row count decides the winner, so concurrent attempts can never both
//! succeed.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Account, AccountStats, NewAccount};

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert a new unverified account. Fails with `DuplicateIdentity` when
    /// the email is already registered.
    async fn insert(&self, account: NewAccount) -> Result<Account>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>>;

    /// Store a pending OTP, overwriting any previous one.
    async fn store_otp(&self, id: Uuid, code: &str, expires_at: DateTime<Utc>) -> Result<()>;

    /// Atomically consume a matching, unexpired OTP and mark the account
    /// verified. Returns whether this call won the transition.
    async fn redeem_otp(&self, email: &str, code: &str) -> Result<bool>;

    /// Clear a pending OTP that has already expired. Returns whether a code
    /// was cleared.
    async fn clear_expired_otp(&self, email: &str) -> Result<bool>;

    /// Store the refresh-token hash for an account, replacing any previous
    /// session.
    async fn store_refresh(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Atomically swap an unexpired refresh-token hash for a new one.
    /// Returns the rotated account, or `None` when the presented hash
    /// matched nothing live (unknown, expired, or already rotated).
    async fn rotate_refresh(
        &self,
        old_hash: &str,
        new_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Option<Account>>;

    /// Drop the account's refresh token, ending its session.
    async fn clear_refresh(&self, id: Uuid) -> Result<()>;

    /// Store the reset-token hash for an account, replacing any previous
    /// pending reset.
    async fn store_reset(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Atomically consume an unexpired reset token: install the new
    /// password hash, clear the reset token, and revoke the refresh
    /// session. Returns the updated account, or `None` when the hash
    /// matched nothing live.
    async fn redeem_reset(
        &self,
        token_hash: &str,
        new_password_hash: &str,
    ) -> Result<Option<Account>>;

    /// Aggregate counts for admin analytics.
    async fn stats(&self) -> Result<AccountStats>;
}
