//! Persistence layer: one repository per entity, each behind a trait so
//! services can be tested against mocks.

pub mod author;
pub mod book;
pub mod user;

pub use author::{AuthorQuery, AuthorRepository, AuthorRepositoryImpl};
pub use book::{BookQuery, BookRepository, BookRepositoryImpl};
pub use user::{UserRepository, UserRepositoryImpl};

use crate::error::AppError;

/// Translate a store-level unique constraint violation into the same
/// `Conflict` the advisory pre-check produces. Two writers can both pass the
/// duplicate pre-check; the database constraint is the authoritative guard.
pub(crate) fn map_unique_violation(err: sqlx::Error, message: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(message.to_string())
        }
        _ => AppError::Database(err),
    }
}

/// MySQL treats a missing LIMIT as "all rows"; sqlx always binds one, so an
/// absent limit becomes the largest value the column type allows.
pub(crate) fn effective_page(offset: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    (offset.unwrap_or(0), limit.unwrap_or(i64::MAX))
}

/// Escape LIKE metacharacters so a filter value matches literally.
/// Normalization already strips `%`, but `_` is a word character and would
/// otherwise act as a single-character wildcard.
pub(crate) fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
