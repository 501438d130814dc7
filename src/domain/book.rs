//! Book domain model

use super::double_option;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Book entity. `title` is stored in normalized form. `managed_by_user`
/// starts as the creator and is cleared by the store when that account is
/// removed; an unmanaged book is claimed by the next user who touches it.
#[derive(Debug, Clone, FromRow)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub year: i32,
    pub author_id: Option<i64>,
    pub managed_by_user: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Book shape exposed over the API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookPublic {
    pub id: i64,
    pub title: String,
    pub year: i32,
    pub author_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Book> for BookPublic {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            year: book.year,
            author_id: book.author_id,
            created_at: book.created_at,
            updated_at: book.updated_at,
        }
    }
}

/// Input for creating a book
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBookInput {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub year: i32,
    pub author_id: Option<i64>,
}

/// Partial update for a book. Absent fields are left untouched; `author_id`
/// distinguishes "absent" from an explicit `null` (detach the author).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateBookInput {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub author_id: Option<Option<i64>>,
}
