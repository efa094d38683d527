use bcrypt::BcryptError;
use sqlx::SqlitePool;
use tokio::sync::OnceCell;

use super::error::{is_unique_violation, DbError};
use crate::models::User;
use crate::password::{hash_password, verify_password};

pub struct UserRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct PasswordRow {
    password: String,
}

static DUMMY_HASH: OnceCell<String> = OnceCell::const_new();

/// Hash checked against when the username is unknown, so both failure paths
/// cost one verification.
async fn dummy_hash() -> Result<&'static str, BcryptError> {
    let hash = DUMMY_HASH
        .get_or_try_init(|| hash_password("no such user"))
        .await?;
    Ok(hash.as_str())
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Stores a new account with a bcrypt hash of `password`.
    ///
    /// Fails with [`DbError::DuplicateUsername`] when the name is taken; the
    /// existing account is left as it was.
    pub async fn register(&self, username: &str, password: &str) -> Result<User, DbError> {
        if username.trim().is_empty() {
            return Err(DbError::InvalidInput("username cannot be empty".into()));
        }
        if password.is_empty() {
            return Err(DbError::InvalidInput("password cannot be empty".into()));
        }

        let digest = hash_password(password).await?;

        sqlx::query("INSERT INTO users (username, password) VALUES (?, ?)")
            .bind(username)
            .bind(&digest)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DbError::DuplicateUsername(username.to_string())
                } else {
                    DbError::Sqlx(e)
                }
            })?;

        tracing::debug!("Registered user {}", username);
        Ok(User::new(username))
    }

    /// Returns true only for a registered username with a matching password.
    ///
    /// An unknown username and a wrong password produce the same `false`.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<bool, DbError> {
        let row: Option<PasswordRow> =
            sqlx::query_as("SELECT password FROM users WHERE username = ?")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;

        let (stored, known) = match &row {
            Some(r) => (r.password.as_str(), true),
            None => (dummy_hash().await?, false),
        };
        let ok = verify_password(password, stored).await? && known;

        if !ok {
            tracing::warn!("Authentication failed for {}", username);
        }
        Ok(ok)
    }

    pub async fn exists(&self, username: &str) -> Result<bool, DbError> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    /// Replaces the password digest when `old_password` authenticates.
    ///
    /// Returns false, changing nothing, when it does not.
    pub async fn change_password(
        &self,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<bool, DbError> {
        if new_password.is_empty() {
            return Err(DbError::InvalidInput("password cannot be empty".into()));
        }
        if !self.authenticate(username, old_password).await? {
            return Ok(false);
        }

        sqlx::query("UPDATE users SET password = ? WHERE username = ?")
            .bind(hash_password(new_password).await?)
            .bind(username)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Changed password for {}", username);
        Ok(true)
    }

    /// Removes an account together with its events, tasks and guests.
    pub async fn delete(&self, username: &str) -> Result<(), DbError> {
        // CASCADE removes events, and through them tasks and guests
        let result = sqlx::query("DELETE FROM users WHERE username = ?")
            .bind(username)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", username));
        }
        tracing::debug!("Deleted user {}", username);
        Ok(())
    }
}
