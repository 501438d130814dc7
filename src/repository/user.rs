//! User repository

use crate::domain::{CreateUserInput, User};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

use super::{effective_page, map_unique_violation};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, input: &CreateUserInput, password_hash: &str) -> Result<User>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn list(&self, offset: Option<i64>, limit: Option<i64>) -> Result<Vec<User>>;
    async fn update(
        &self,
        id: i64,
        input: &CreateUserInput,
        password_hash: &str,
    ) -> Result<User>;
    async fn delete(&self, id: i64) -> Result<()>;
}

pub struct UserRepositoryImpl {
    pool: MySqlPool,
}

impl UserRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

const USER_COLUMNS: &str = "id, username, email, password_hash, created_at, updated_at";

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn create(&self, input: &CreateUserInput, password_hash: &str) -> Result<User> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, email, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(&input.username)
        .bind(&input.email)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Username or email already exists"))?;

        let id = result.last_insert_id() as i64;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create user")))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn list(&self, offset: Option<i64>, limit: Option<i64>) -> Result<Vec<User>> {
        let (offset, limit) = effective_page(offset, limit);
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id LIMIT ? OFFSET ?"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn update(
        &self,
        id: i64,
        input: &CreateUserInput,
        password_hash: &str,
    ) -> Result<User> {
        // MySQL reports zero affected rows for a no-op update, so existence
        // is decided by the re-fetch rather than rows_affected.
        sqlx::query(
            r#"
            UPDATE users
            SET username = ?, email = ?, password_hash = ?, updated_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(&input.username)
        .bind(&input.email)
        .bind(password_hash)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Username or email already exists"))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        Ok(())
    }
}
