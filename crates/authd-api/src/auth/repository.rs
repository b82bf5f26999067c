//! Account persistence over PostgreSQL
//!
//! The only datastore operations the credential subsystem performs: find by
//! email, find by id, create, and replace the password digest. The unique
//! constraint on `accounts.email` is the authoritative uniqueness guarantee;
//! `create` surfaces its violation as `EmailTaken` so two concurrent signups
//! racing past the service-level pre-check still resolve to one winner.

use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use super::models::Account;

/// Repository errors
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Account not found")]
    AccountNotFound,

    #[error("Email already registered")]
    EmailTaken,
}

const ACCOUNT_COLUMNS: &str = "id, name, email, password_hash, profile, created_at, updated_at";

/// Account repository
#[derive(Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an account by email (exact, case-sensitive match)
    pub async fn find_by_email(&self, email: &str) -> Result<Account, RepositoryError> {
        let query = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1");

        sqlx::query_as::<_, Account>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?
            .ok_or(RepositoryError::AccountNotFound)
    }

    /// Find an account by id
    pub async fn find_by_id(&self, id: Uuid) -> Result<Account, RepositoryError> {
        let query = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1");

        sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?
            .ok_or(RepositoryError::AccountNotFound)
    }

    /// Insert a new account and return the created record
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        profile: serde_json::Value,
    ) -> Result<Account, RepositoryError> {
        let query = format!(
            "INSERT INTO accounts (id, name, email, password_hash, profile) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {ACCOUNT_COLUMNS}"
        );

        sqlx::query_as::<_, Account>(&query)
            .bind(Uuid::new_v4())
            .bind(name)
            .bind(email)
            .bind(password_hash)
            .bind(profile)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    RepositoryError::EmailTaken
                }
                _ => RepositoryError::Database(e.to_string()),
            })
    }

    /// Replace the stored password digest and return the updated record
    pub async fn update_password(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<Account, RepositoryError> {
        let query = format!(
            "UPDATE accounts SET password_hash = $2, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {ACCOUNT_COLUMNS}"
        );

        sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .bind(password_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?
            .ok_or(RepositoryError::AccountNotFound)
    }
}
