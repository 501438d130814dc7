//! Book repository

use crate::domain::{Book, UpdateBookInput};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

use super::{effective_page, escape_like, map_unique_violation};

/// Filter and pagination parameters for listing books. `title` is expected
/// in normalized form and matches as a substring; `year` matches exactly.
#[derive(Debug, Clone, Default)]
pub struct BookQuery {
    pub managed_by: i64,
    pub title: Option<String>,
    pub year: Option<i32>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn create(
        &self,
        title: &str,
        year: i32,
        author_id: Option<i64>,
        managed_by: i64,
    ) -> Result<Book>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Book>>;
    /// Exact match on the stored (normalized) title.
    async fn find_by_title(&self, title: &str) -> Result<Option<Book>>;
    async fn list(&self, query: &BookQuery) -> Result<Vec<Book>>;
    /// Apply a partial update. `patch.title` must already be normalized.
    async fn update(&self, id: i64, patch: &UpdateBookInput) -> Result<Book>;
    /// Atomically set `managed_by_user` if and only if it is currently NULL.
    /// Returns whether this call won the claim.
    async fn claim(&self, id: i64, user_id: i64) -> Result<bool>;
    async fn delete(&self, id: i64) -> Result<()>;
}

pub struct BookRepositoryImpl {
    pool: MySqlPool,
}

impl BookRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

const BOOK_COLUMNS: &str = "id, title, year, author_id, managed_by_user, created_at, updated_at";

pub(crate) const DUPLICATE_TITLE: &str = "Book with the same title already exists";

#[async_trait]
impl BookRepository for BookRepositoryImpl {
    async fn create(
        &self,
        title: &str,
        year: i32,
        author_id: Option<i64>,
        managed_by: i64,
    ) -> Result<Book> {
        let result = sqlx::query(
            r#"
            INSERT INTO books (title, year, author_id, managed_by_user, created_at, updated_at)
            VALUES (?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(title)
        .bind(year)
        .bind(author_id)
        .bind(managed_by)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, DUPLICATE_TITLE))?;

        let id = result.last_insert_id() as i64;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create book")))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE title = ?"
        ))
        .bind(title)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    async fn list(&self, query: &BookQuery) -> Result<Vec<Book>> {
        let (offset, limit) = effective_page(query.offset, query.limit);
        let title_filter = query.title.as_deref().map(escape_like);
        let books = sqlx::query_as::<_, Book>(&format!(
            r#"
            SELECT {BOOK_COLUMNS}
            FROM books
            WHERE managed_by_user = ?
              AND (? IS NULL OR title LIKE CONCAT('%', ?, '%'))
              AND (? IS NULL OR year = ?)
            ORDER BY id
            LIMIT ? OFFSET ?
            "#
        ))
        .bind(query.managed_by)
        .bind(&title_filter)
        .bind(&title_filter)
        .bind(query.year)
        .bind(query.year)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    async fn update(&self, id: i64, patch: &UpdateBookInput) -> Result<Book> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;

        let title = patch.title.as_deref().unwrap_or(&existing.title);
        let year = patch.year.unwrap_or(existing.year);
        let author_id = patch.author_id.unwrap_or(existing.author_id);

        sqlx::query(
            r#"
            UPDATE books
            SET title = ?, year = ?, author_id = ?, updated_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(title)
        .bind(year)
        .bind(author_id)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, DUPLICATE_TITLE))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    async fn claim(&self, id: i64, user_id: i64) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE books SET managed_by_user = ? WHERE id = ? AND managed_by_user IS NULL",
        )
        .bind(user_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Book not found".to_string()));
        }

        Ok(())
    }
}
