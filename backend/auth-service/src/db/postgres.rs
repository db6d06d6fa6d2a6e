use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::AccountStore;
use crate::error::{AuthError, Result};
use crate::models::{Account, AccountStats, NewAccount};

/// PostgreSQL-backed account store.
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .map(|code| code == "23505")
        .unwrap_or(false)
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn insert(&self, account: NewAccount) -> Result<Account> {
        sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (id, email, password_hash, role, verified, created_at, updated_at)
            VALUES ($1, $2, $3, $4, FALSE, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(account.id)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AuthError::DuplicateIdentity
            } else {
                e.into()
            }
        })
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    async fn store_otp(&self, id: Uuid, code: &str, expires_at: DateTime<Utc>) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE accounts
            SET otp_code = $2, otp_expires_at = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(code)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn redeem_otp(&self, email: &str, code: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET verified = TRUE, otp_code = NULL, otp_expires_at = NULL, updated_at = NOW()
            WHERE email = $1 AND otp_code = $2 AND otp_expires_at > NOW()
            "#,
        )
        .bind(email)
        .bind(code)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn clear_expired_otp(&self, email: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET otp_code = NULL, otp_expires_at = NULL, updated_at = NOW()
            WHERE email = $1 AND otp_code IS NOT NULL AND otp_expires_at <= NOW()
            "#,
        )
        .bind(email)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn store_refresh(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE accounts
            SET refresh_token_hash = $2, refresh_expires_at = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn rotate_refresh(
        &self,
        old_hash: &str,
        new_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts
            SET refresh_token_hash = $2, refresh_expires_at = $3, updated_at = NOW()
            WHERE refresh_token_hash = $1 AND refresh_expires_at > NOW()
            RETURNING *
            "#,
        )
        .bind(old_hash)
        .bind(new_hash)
        .bind(expires_at)
        .fetch_optional(&self.pool)
        .await?;
        Ok(account)
    }

    async fn clear_refresh(&self, id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE accounts
            SET refresh_token_hash = NULL, refresh_expires_at = NULL, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn store_reset(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE accounts
            SET reset_token_hash = $2, reset_expires_at = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn redeem_reset(
        &self,
        token_hash: &str,
        new_password_hash: &str,
    ) -> Result<Option<Account>> {
        // Redeeming a reset also revokes the refresh session, so stolen
        // sessions die with the old password.
        let account = sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts
            SET password_hash = $2,
                reset_token_hash = NULL, reset_expires_at = NULL,
                refresh_token_hash = NULL, refresh_expires_at = NULL,
                updated_at = NOW()
            WHERE reset_token_hash = $1 AND reset_expires_at > NOW()
            RETURNING *
            "#,
        )
        .bind(token_hash)
        .bind(new_password_hash)
        .fetch_optional(&self.pool)
        .await?;
        Ok(account)
    }

    async fn stats(&self) -> Result<AccountStats> {
        let (total, verified, admins): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE verified),
                   COUNT(*) FILTER (WHERE role = 'admin')
            FROM accounts
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(AccountStats {
            total_accounts: total,
            verified_accounts: verified,
            admin_accounts: admins,
        })
    }
}
