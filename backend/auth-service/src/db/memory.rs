//! In-memory account store.
//!
//! Mirrors the compare-and-swap semantics of the Postgres store so the
//! full auth state machine can be exercised in tests without a database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use crate::db::AccountStore;
use crate::error::{AuthError, Result};
use crate::models::{Account, AccountStats, NewAccount};

#[derive(Default)]
pub struct MemoryAccountStore {
    accounts: Mutex<HashMap<Uuid, Account>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<Uuid, Account>>> {
        self.accounts
            .lock()
            .map_err(|_| AuthError::Internal("Account store lock poisoned".into()))
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn insert(&self, account: NewAccount) -> Result<Account> {
        let mut accounts = self.lock()?;
        if accounts.values().any(|a| a.email == account.email) {
            return Err(AuthError::DuplicateIdentity);
        }

        let now = Utc::now();
        let row = Account {
            id: account.id,
            email: account.email,
            password_hash: account.password_hash,
            role: account.role,
            verified: false,
            otp_code: None,
            otp_expires_at: None,
            refresh_token_hash: None,
            refresh_expires_at: None,
            reset_token_hash: None,
            reset_expires_at: None,
            created_at: now,
            updated_at: now,
        };
        accounts.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let accounts = self.lock()?;
        Ok(accounts.values().find(|a| a.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>> {
        let accounts = self.lock()?;
        Ok(accounts.get(&id).cloned())
    }

    async fn store_otp(&self, id: Uuid, code: &str, expires_at: DateTime<Utc>) -> Result<()> {
        let mut accounts = self.lock()?;
        if let Some(account) = accounts.get_mut(&id) {
            account.otp_code = Some(code.to_string());
            account.otp_expires_at = Some(expires_at);
            account.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn redeem_otp(&self, email: &str, code: &str) -> Result<bool> {
        let mut accounts = self.lock()?;
        let now = Utc::now();
        let account = accounts.values_mut().find(|a| {
            a.email == email
                && a.otp_code.as_deref() == Some(code)
                && a.otp_expires_at.map(|at| at > now).unwrap_or(false)
        });

        match account {
            Some(account) => {
                account.verified = true;
                account.otp_code = None;
                account.otp_expires_at = None;
                account.updated_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn clear_expired_otp(&self, email: &str) -> Result<bool> {
        let mut accounts = self.lock()?;
        let now = Utc::now();
        let account = accounts.values_mut().find(|a| {
            a.email == email
                && a.otp_code.is_some()
                && a.otp_expires_at.map(|at| at <= now).unwrap_or(true)
        });

        match account {
            Some(account) => {
                account.otp_code = None;
                account.otp_expires_at = None;
                account.updated_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn store_refresh(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut accounts = self.lock()?;
        if let Some(account) = accounts.get_mut(&id) {
            account.refresh_token_hash = Some(token_hash.to_string());
            account.refresh_expires_at = Some(expires_at);
            account.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn rotate_refresh(
        &self,
        old_hash: &str,
        new_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Option<Account>> {
        let mut accounts = self.lock()?;
        let now = Utc::now();
        let account = accounts.values_mut().find(|a| {
            a.refresh_token_hash.as_deref() == Some(old_hash)
                && a.refresh_expires_at.map(|at| at > now).unwrap_or(false)
        });

        match account {
            Some(account) => {
                account.refresh_token_hash = Some(new_hash.to_string());
                account.refresh_expires_at = Some(expires_at);
                account.updated_at = now;
                Ok(Some(account.clone()))
            }
            None => Ok(None),
        }
    }

    async fn clear_refresh(&self, id: Uuid) -> Result<()> {
        let mut accounts = self.lock()?;
        if let Some(account) = accounts.get_mut(&id) {
            account.refresh_token_hash = None;
            account.refresh_expires_at = None;
            account.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn store_reset(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut accounts = self.lock()?;
        if let Some(account) = accounts.get_mut(&id) {
            account.reset_token_hash = Some(token_hash.to_string());
            account.reset_expires_at = Some(expires_at);
            account.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn redeem_reset(
        &self,
        token_hash: &str,
        new_password_hash: &str,
    ) -> Result<Option<Account>> {
        let mut accounts = self.lock()?;
        let now = Utc::now();
        let account = accounts.values_mut().find(|a| {
            a.reset_token_hash.as_deref() == Some(token_hash)
                && a.reset_expires_at.map(|at| at > now).unwrap_or(false)
        });

        match account {
            Some(account) => {
                account.password_hash = new_password_hash.to_string();
                account.reset_token_hash = None;
                account.reset_expires_at = None;
                account.refresh_token_hash = None;
                account.refresh_expires_at = None;
                account.updated_at = now;
                Ok(Some(account.clone()))
            }
            None => Ok(None),
        }
    }

    async fn stats(&self) -> Result<AccountStats> {
        let accounts = self.lock()?;
        Ok(AccountStats {
            total_accounts: accounts.len() as i64,
            verified_accounts: accounts.values().filter(|a| a.verified).count() as i64,
            admin_accounts: accounts.values().filter(|a| a.role.is_admin()).count() as i64,
        })
    }
}
