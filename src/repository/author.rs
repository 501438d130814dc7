//! Author repository

use crate::domain::Author;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

use super::{effective_page, escape_like, map_unique_violation};

/// Filter and pagination parameters for listing authors. `name` is expected
/// in normalized form and matches as a substring.
#[derive(Debug, Clone, Default)]
pub struct AuthorQuery {
    pub created_by: i64,
    pub name: Option<String>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    async fn create(&self, name: &str, created_by: i64) -> Result<Author>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Author>>;
    /// Exact match on the stored (normalized) name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Author>>;
    async fn list(&self, query: &AuthorQuery) -> Result<Vec<Author>>;
    async fn update_name(&self, id: i64, name: &str) -> Result<Author>;
    /// Atomically set `created_by_user` if and only if it is currently NULL.
    /// Returns whether this call won the claim.
    async fn claim(&self, id: i64, user_id: i64) -> Result<bool>;
    async fn delete(&self, id: i64) -> Result<()>;
}

pub struct AuthorRepositoryImpl {
    pool: MySqlPool,
}

impl AuthorRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

const AUTHOR_COLUMNS: &str = "id, name, created_by_user, created_at, updated_at";

pub(crate) const DUPLICATE_NAME: &str = "Author with the same name already exists";

#[async_trait]
impl AuthorRepository for AuthorRepositoryImpl {
    async fn create(&self, name: &str, created_by: i64) -> Result<Author> {
        let result = sqlx::query(
            r#"
            INSERT INTO authors (name, created_by_user, created_at, updated_at)
            VALUES (?, ?, NOW(), NOW())
            "#,
        )
        .bind(name)
        .bind(created_by)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, DUPLICATE_NAME))?;

        let id = result.last_insert_id() as i64;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create author")))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Author>> {
        let author = sqlx::query_as::<_, Author>(&format!(
            "SELECT {AUTHOR_COLUMNS} FROM authors WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(author)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Author>> {
        let author = sqlx::query_as::<_, Author>(&format!(
            "SELECT {AUTHOR_COLUMNS} FROM authors WHERE name = ?"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(author)
    }

    async fn list(&self, query: &AuthorQuery) -> Result<Vec<Author>> {
        let (offset, limit) = effective_page(query.offset, query.limit);
        let name_filter = query.name.as_deref().map(escape_like);
        let authors = sqlx::query_as::<_, Author>(&format!(
            r#"
            SELECT {AUTHOR_COLUMNS}
            FROM authors
            WHERE created_by_user = ?
              AND (? IS NULL OR name LIKE CONCAT('%', ?, '%'))
            ORDER BY id
            LIMIT ? OFFSET ?
            "#
        ))
        .bind(query.created_by)
        .bind(&name_filter)
        .bind(&name_filter)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(authors)
    }

    async fn update_name(&self, id: i64, name: &str) -> Result<Author> {
        sqlx::query("UPDATE authors SET name = ?, updated_at = NOW() WHERE id = ?")
            .bind(name)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, DUPLICATE_NAME))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Author not found".to_string()))
    }

    async fn claim(&self, id: i64, user_id: i64) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE authors SET created_by_user = ? WHERE id = ? AND created_by_user IS NULL",
        )
        .bind(user_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM authors WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Author not found".to_string()));
        }

        Ok(())
    }
}
